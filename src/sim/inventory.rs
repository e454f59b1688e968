//! Items and the inventory carried by the player

use serde::{Deserialize, Serialize};

use super::entity::BuffKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Temporary max-health increase
    HealthTonic,
    /// Temporary staff bolt attack
    Staff,
}

impl ItemKind {
    /// Buff granted when used: (kind, duration seconds, magnitude)
    pub fn effect(&self) -> (BuffKind, f32, f32) {
        match self {
            ItemKind::HealthTonic => (BuffKind::MaxHealthBoost, 30.0, 3.0),
            ItemKind::Staff => (BuffKind::RangedAttack, 20.0, 1.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::HealthTonic => "health_tonic",
            ItemKind::Staff => "staff",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<ItemKind>,
    selected: usize,
}

impl Inventory {
    pub fn add(&mut self, item: ItemKind) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[ItemKind] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    /// Remove and return the selected item
    pub fn take_selected(&mut self) -> Option<ItemKind> {
        if self.selected >= self.items.len() {
            return None;
        }
        let item = self.items.remove(self.selected);
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        Some(item)
    }
}
