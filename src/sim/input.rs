//! Abstracted input actions
//!
//! The host translates raw device events into named actions with an edge
//! (press / hold / release). The core consumes edges and never polls devices.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Interact,
    Confirm,
    Cancel,
    ToggleInventory,
    TogglePause,
    FireRanged,
}

const ACTION_COUNT: usize = 9;

impl Action {
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Interact,
        Action::Confirm,
        Action::Cancel,
        Action::ToggleInventory,
        Action::TogglePause,
        Action::FireRanged,
    ];

    const fn index(self) -> usize {
        match self {
            Action::MoveLeft => 0,
            Action::MoveRight => 1,
            Action::Jump => 2,
            Action::Interact => 3,
            Action::Confirm => 4,
            Action::Cancel => 5,
            Action::ToggleInventory => 6,
            Action::TogglePause => 7,
            Action::FireRanged => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::Jump => "jump",
            Action::Interact => "interact",
            Action::Confirm => "confirm",
            Action::Cancel => "cancel",
            Action::ToggleInventory => "toggle_inventory",
            Action::TogglePause => "toggle_pause",
            Action::FireRanged => "fire_ranged",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Action::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Pressed,
    Held,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub action: Action,
    pub edge: Edge,
}

impl InputEvent {
    pub fn pressed(action: Action) -> Self {
        Self {
            action,
            edge: Edge::Pressed,
        }
    }

    pub fn held(action: Action) -> Self {
        Self {
            action,
            edge: Edge::Held,
        }
    }

    pub fn released(action: Action) -> Self {
        Self {
            action,
            edge: Edge::Released,
        }
    }
}

/// Which actions are currently held, derived from edges
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    down: [bool; ACTION_COUNT],
}

impl InputState {
    pub fn apply(&mut self, event: &InputEvent) {
        self.down[event.action.index()] = !matches!(event.edge, Edge::Released);
    }

    pub fn is_down(&self, action: Action) -> bool {
        self.down[action.index()]
    }
}
