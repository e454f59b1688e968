//! Game settings and tuning
//!
//! Handed to the core as JSON text by the host; every section defaults so a
//! partial document is accepted.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier on enemy contact and projectile damage dealt to the player
    pub fn damage_taken_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Bonus base max health for the player
    pub fn bonus_max_health(&self) -> i32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Normal => 0,
            Difficulty::Hard => -1,
        }
    }
}

/// Player movement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub walk_speed: f32,
    /// Launch velocity (negative = up)
    pub jump_velocity: f32,
    pub landing_tolerance: f32,
    pub edge_margin: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            walk_speed: WALK_SPEED,
            jump_velocity: JUMP_VELOCITY,
            landing_tolerance: LANDING_TOLERANCE,
            edge_margin: EDGE_MARGIN,
        }
    }
}

/// Camera follow tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Share of the remaining distance covered per 60 Hz frame
    pub smoothing_h: f32,
    pub smoothing_v: f32,
    pub vertical_deadzone: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            smoothing_h: CAMERA_SMOOTHING_H,
            smoothing_v: CAMERA_SMOOTHING_V,
            vertical_deadzone: CAMERA_VERTICAL_DEADZONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueTuning {
    /// Characters revealed per second
    pub reveal_rate: f32,
}

impl Default for DialogueTuning {
    fn default() -> Self {
        Self {
            reveal_rate: REVEAL_RATE,
        }
    }
}

/// Volumes forwarded to the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Effective cue volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub physics: PhysicsTuning,
    pub camera: CameraTuning,
    pub dialogue: DialogueTuning,
    pub audio: AudioSettings,
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Parse settings handed over by the host
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        log::info!("Loaded settings (difficulty: {})", settings.difficulty.as_str());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Player base max health after the difficulty bonus (never below 1)
    pub fn player_max_health(&self) -> i32 {
        (PLAYER_MAX_HEALTH + self.difficulty.bonus_max_health()).max(1)
    }

    /// Scale incoming damage for the player (never below 1 for a non-zero hit)
    pub fn scale_damage_taken(&self, damage: i32) -> i32 {
        if damage <= 0 {
            return 0;
        }
        ((damage as f32 * self.difficulty.damage_taken_scale()).round() as i32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "camera": { "vertical_deadzone": 12.0 } }"#)
            .expect("parse");
        assert_eq!(settings.camera.vertical_deadzone, 12.0);
        assert_eq!(settings.camera.viewport_width, VIEWPORT_WIDTH);
        assert_eq!(settings.physics, PhysicsTuning::default());
        assert_eq!(settings.difficulty, Difficulty::Normal);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("norm"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_damage_scaling_never_drops_a_hit() {
        let easy = Settings::from_difficulty(Difficulty::Easy);
        assert_eq!(easy.scale_damage_taken(1), 1);
        assert_eq!(easy.scale_damage_taken(4), 2);
        assert_eq!(easy.scale_damage_taken(0), 0);
        let hard = Settings::from_difficulty(Difficulty::Hard);
        assert_eq!(hard.scale_damage_taken(2), 3);
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let audio = AudioSettings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(audio.effective_volume(), 0.0);
    }

    #[test]
    fn test_json_round_trip_keeps_difficulty() {
        let settings = Settings::from_difficulty(Difficulty::Easy);
        let json = settings.to_json().expect("serialize");
        let back = Settings::from_json(&json).expect("parse");
        assert_eq!(back.difficulty, Difficulty::Easy);
        assert_eq!(back.player_max_health(), PLAYER_MAX_HEALTH + 2);
    }
}
