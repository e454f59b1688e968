//! Platform catalog
//!
//! Level authors hand platforms over either as structured records or as loose
//! key/value maps. Both collapse to a single `Platform` at load time so the
//! collision code never branches on representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::geom::Rect;
use crate::error::LevelError;

/// Surface material (render color only, no physics effect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Stone,
    Wood,
    Grass,
    Brick,
}

impl Material {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stone" | "rock" => Some(Material::Stone),
            "wood" | "plank" => Some(Material::Wood),
            "grass" | "dirt" => Some(Material::Grass),
            "brick" => Some(Material::Brick),
            _ => None,
        }
    }

    /// Fill color (0xRRGGBB) for the renderer
    pub fn color(&self) -> u32 {
        match self {
            Material::Stone => 0x80_80_88,
            Material::Wood => 0x8b_5a_2b,
            Material::Grass => 0x4c_a0_3c,
            Material::Brick => 0xa0_40_30,
        }
    }
}

/// A static axis-aligned platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub material: Material,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, material: Material) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            material,
        }
    }
}

/// Structured platform record as authored
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub material: Material,
}

/// Any platform representation accepted from level data
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlatformRecord {
    Structured(PlatformSpec),
    Loose(Map<String, Value>),
}

impl PlatformRecord {
    /// Collapse into a `Platform`; `index` is only used for error reporting
    pub fn into_platform(self, index: usize) -> Result<Platform, LevelError> {
        let platform = match self {
            PlatformRecord::Structured(spec) => {
                Platform::new(spec.x, spec.y, spec.width, spec.height, spec.material)
            }
            PlatformRecord::Loose(map) => {
                let num = |keys: &[&str]| -> Result<f32, LevelError> {
                    keys.iter()
                        .find_map(|k| map.get(*k))
                        .and_then(loose_number)
                        .ok_or_else(|| LevelError::MalformedPlatform {
                            index,
                            reason: format!("missing numeric `{}`", keys[0]),
                        })
                };
                let material = ["material", "type", "kind"]
                    .iter()
                    .find_map(|k| map.get(*k))
                    .and_then(Value::as_str)
                    .and_then(Material::from_str)
                    .unwrap_or_default();
                Platform::new(
                    num(&["x"])?,
                    num(&["y"])?,
                    num(&["width", "w"])?,
                    num(&["height", "h"])?,
                    material,
                )
            }
        };

        let r = platform.rect;
        if !(r.x.is_finite() && r.y.is_finite()) || !(r.w > 0.0 && r.h > 0.0) {
            return Err(LevelError::MalformedPlatform {
                index,
                reason: format!("non-positive or non-finite extent {}x{}", r.w, r.h),
            });
        }
        Ok(platform)
    }
}

/// Numbers may arrive as JSON numbers or numeric strings
fn loose_number(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    }
}

/// Immutable per-level platform collection, iterated in authoring order
#[derive(Debug, Clone, Default)]
pub struct PlatformCatalog {
    platforms: Vec<Platform>,
}

impl PlatformCatalog {
    pub fn new(platforms: Vec<Platform>) -> Self {
        Self { platforms }
    }

    /// Build from authored records, skipping malformed entries.
    /// Returns the catalog and the number of skipped records.
    pub fn from_records(records: Vec<PlatformRecord>) -> (Self, usize) {
        let mut platforms = Vec::with_capacity(records.len());
        let mut skipped = 0;
        for (index, record) in records.into_iter().enumerate() {
            match record.into_platform(index) {
                Ok(p) => platforms.push(p),
                Err(e) => {
                    log::warn!("Skipping platform: {}", e);
                    skipped += 1;
                }
            }
        }
        (Self { platforms }, skipped)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Topmost platform surface (smallest y), if any
    pub fn highest_top(&self) -> Option<f32> {
        self.platforms.iter().map(|p| p.rect.top()).reduce(f32::min)
    }
}
