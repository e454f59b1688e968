//! Dialogue content graph and the typing sub-machine
//!
//! Content (conversation id -> entry node, node id -> node) comes from an
//! external collaborator; the runtime only traverses it. A reference to a
//! missing node always ends the conversation instead of stalling it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueChoice {
    pub label: String,
    pub next: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub choices: Vec<DialogueChoice>,
}

impl DialogueNode {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Conversation graph supplied by the content collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueContent {
    /// Conversation id -> entry node id
    #[serde(default)]
    pub conversations: HashMap<String, String>,
    #[serde(default)]
    pub nodes: HashMap<String, DialogueNode>,
}

impl DialogueContent {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Built-in demo conversations
    pub fn demo() -> Result<Self, LevelError> {
        Self::from_json(DEMO_DIALOGUE_JSON)
    }

    pub fn entry(&self, conversation: &str) -> Option<&str> {
        self.conversations.get(conversation).map(String::as_str)
    }

    pub fn node(&self, id: &str) -> Option<&DialogueNode> {
        self.nodes.get(id)
    }

    /// Conversations whose entry node does not exist. Dangling choices are
    /// left alone; they end the conversation at runtime.
    pub fn validate(&self) -> Vec<LevelError> {
        let mut problems: Vec<LevelError> = self
            .conversations
            .iter()
            .filter(|(_, node)| !self.nodes.contains_key(*node))
            .map(|(conversation, node)| LevelError::DanglingEntry {
                conversation: conversation.clone(),
                node: node.clone(),
            })
            .collect();
        problems.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
        problems
    }
}

/// Sub-machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DialoguePhase {
    /// Characters are being revealed
    Typing,
    /// Full text shown, waiting for confirm
    AwaitingInput,
    /// Resolving the chosen next node
    Advancing,
    /// Conversation over (runtime inactive)
    #[default]
    Ended,
}

/// Why a conversation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// Last node confirmed (no choices)
    Completed,
    /// A choice or entry pointed at a node that does not exist
    MissingNode(String),
    /// Cancelled by the player
    ForceExit,
}

/// Result of feeding input to the sub-machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueSignal {
    /// Typing was skipped to the full text
    Skipped,
    /// Moved to another node
    Advanced(String),
    /// Leave the Dialogue state
    Ended(EndReason),
}

/// What a typing update revealed this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypingReport {
    /// More characters became visible
    pub revealed_more: bool,
    /// Typing completed this frame
    pub finished: bool,
}

// Absorbs accumulated float error so N chars appear at exactly N / rate
const REVEAL_EPSILON: f64 = 1e-6;

/// Runtime state of the active conversation
#[derive(Debug, Clone, Default)]
pub struct DialogueRuntime {
    pub active: bool,
    pub current_node: Option<String>,
    pub revealed_char_count: usize,
    pub phase: DialoguePhase,
    /// Selected choice index (first-listed by default)
    pub selected_choice: usize,
    reveal_counter: f64,
    text_len: usize,
}

impl DialogueRuntime {
    pub fn typing(&self) -> bool {
        self.phase == DialoguePhase::Typing
    }

    pub fn awaiting_input(&self) -> bool {
        self.phase == DialoguePhase::AwaitingInput
    }

    /// Arm the runtime with a conversation's entry node
    pub fn start(&mut self, content: &DialogueContent, conversation: &str) -> DialogueSignal {
        match content.entry(conversation) {
            Some(entry) => {
                let entry = entry.to_string();
                self.active = true;
                self.load(content, entry)
            }
            None => {
                self.reset();
                DialogueSignal::Ended(EndReason::MissingNode(conversation.to_string()))
            }
        }
    }

    /// Enter `node_id`, or end if it does not exist
    fn load(&mut self, content: &DialogueContent, node_id: String) -> DialogueSignal {
        let Some(node) = content.node(&node_id) else {
            self.reset();
            return DialogueSignal::Ended(EndReason::MissingNode(node_id));
        };
        self.text_len = node.char_len();
        self.revealed_char_count = 0;
        self.reveal_counter = 0.0;
        self.selected_choice = 0;
        self.phase = DialoguePhase::Typing;
        self.current_node = Some(node_id.clone());
        DialogueSignal::Advanced(node_id)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reveal characters at `reveal_rate` chars/s
    pub fn update(&mut self, dt: f32, reveal_rate: f32) -> TypingReport {
        let mut report = TypingReport::default();
        if !self.active || self.phase != DialoguePhase::Typing {
            return report;
        }
        self.reveal_counter += f64::from(dt.max(0.0)) * f64::from(reveal_rate.max(0.0));
        let shown = ((self.reveal_counter + REVEAL_EPSILON).floor() as usize).min(self.text_len);
        if shown > self.revealed_char_count {
            self.revealed_char_count = shown;
            report.revealed_more = true;
        }
        if self.revealed_char_count >= self.text_len {
            self.phase = DialoguePhase::AwaitingInput;
            report.finished = true;
        }
        report
    }

    /// Confirm input: skip typing, or advance along the selected choice
    pub fn confirm(&mut self, content: &DialogueContent) -> DialogueSignal {
        if !self.active {
            return DialogueSignal::Ended(EndReason::Completed);
        }
        match self.phase {
            DialoguePhase::Typing => {
                self.revealed_char_count = self.text_len;
                self.phase = DialoguePhase::AwaitingInput;
                DialogueSignal::Skipped
            }
            DialoguePhase::AwaitingInput => {
                self.phase = DialoguePhase::Advancing;
                self.advance(content)
            }
            DialoguePhase::Advancing => self.advance(content),
            DialoguePhase::Ended => DialogueSignal::Ended(EndReason::Completed),
        }
    }

    fn advance(&mut self, content: &DialogueContent) -> DialogueSignal {
        let next = self
            .current_node
            .as_deref()
            .and_then(|id| content.node(id))
            .and_then(|node| {
                node.choices
                    .get(self.selected_choice)
                    .or_else(|| node.choices.first())
            })
            .map(|choice| choice.next.clone());

        match next {
            Some(next) => self.load(content, next),
            None => {
                // A vanished current node is a missing reference too
                let reason = match self.current_node.as_deref() {
                    Some(id) if content.node(id).is_none() => EndReason::MissingNode(id.to_string()),
                    _ => EndReason::Completed,
                };
                self.reset();
                DialogueSignal::Ended(reason)
            }
        }
    }

    /// Force-exit the conversation
    pub fn cancel(&mut self) -> DialogueSignal {
        self.reset();
        DialogueSignal::Ended(EndReason::ForceExit)
    }

    /// Cycle the selected choice (only while awaiting input)
    pub fn select_choice(&mut self, content: &DialogueContent, step: i32) {
        if self.phase != DialoguePhase::AwaitingInput {
            return;
        }
        let count = self
            .current_node
            .as_deref()
            .and_then(|id| content.node(id))
            .map(|n| n.choices.len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        let idx = (self.selected_choice as i64 + i64::from(step)).rem_euclid(count as i64);
        self.selected_choice = idx as usize;
    }

    /// The currently visible prefix of the node text
    pub fn visible_text<'a>(&self, content: &'a DialogueContent) -> Option<&'a str> {
        let node = content.node(self.current_node.as_deref()?)?;
        let end = node
            .text
            .char_indices()
            .nth(self.revealed_char_count)
            .map(|(i, _)| i)
            .unwrap_or(node.text.len());
        Some(&node.text[..end])
    }
}

/// Demo conversations for the built-in level
pub const DEMO_DIALOGUE_JSON: &str = r#"{
    "conversations": { "hermit": "hermit_intro" },
    "nodes": {
        "hermit_intro": {
            "speaker": "Hermit",
            "text": "The ridge is no place for the unarmed, traveler.",
            "choices": [
                { "label": "I can handle myself.", "next": "hermit_proud" },
                { "label": "Any advice?", "next": "hermit_advice" }
            ]
        },
        "hermit_proud": {
            "speaker": "Hermit",
            "text": "Then go. The slimes will teach you humility."
        },
        "hermit_advice": {
            "speaker": "Hermit",
            "text": "A staff lies past the brick ledge. Take it.",
            "choices": [ { "label": "Thanks.", "next": "hermit_farewell" } ]
        },
        "hermit_farewell": {
            "speaker": "Hermit",
            "text": "Mind the archer on the flats."
        }
    }
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str) -> DialogueContent {
        let mut c = DialogueContent::default();
        c.conversations.insert("talk".into(), "a".into());
        c.nodes.insert(
            "a".into(),
            DialogueNode {
                speaker: "A".into(),
                text: text.into(),
                choices: vec![
                    DialogueChoice {
                        label: "one".into(),
                        next: "b".into(),
                    },
                    DialogueChoice {
                        label: "two".into(),
                        next: "missing".into(),
                    },
                ],
            },
        );
        c.nodes.insert(
            "b".into(),
            DialogueNode {
                speaker: "B".into(),
                text: "bye".into(),
                choices: vec![],
            },
        );
        c
    }

    #[test]
    fn test_typing_reveals_at_rate() {
        let c = content("0123456789012345678901234567890123456789");
        let mut rt = DialogueRuntime::default();
        assert_eq!(rt.start(&c, "talk"), DialogueSignal::Advanced("a".into()));
        assert!(rt.typing());
        assert_eq!(rt.revealed_char_count, 0);

        let dt = 1.0 / 60.0;
        for _ in 0..79 {
            rt.update(dt, 30.0);
        }
        assert_eq!(rt.revealed_char_count, 39);
        assert!(rt.typing());

        let report = rt.update(dt, 30.0);
        assert!(report.finished);
        assert_eq!(rt.revealed_char_count, 40);
        assert!(rt.awaiting_input());

        // Further updates never exceed the text length
        rt.update(1.0, 30.0);
        assert_eq!(rt.revealed_char_count, 40);
    }

    #[test]
    fn test_confirm_skips_typing() {
        let c = content("hello world");
        let mut rt = DialogueRuntime::default();
        rt.start(&c, "talk");
        rt.update(0.1, 30.0);
        assert_eq!(rt.confirm(&c), DialogueSignal::Skipped);
        assert_eq!(rt.revealed_char_count, 11);
        assert!(rt.awaiting_input());
    }

    #[test]
    fn test_first_choice_is_default() {
        let c = content("hi");
        let mut rt = DialogueRuntime::default();
        rt.start(&c, "talk");
        rt.confirm(&c);
        assert_eq!(rt.confirm(&c), DialogueSignal::Advanced("b".into()));
        assert!(rt.typing());
        assert_eq!(rt.revealed_char_count, 0);

        // Node without choices ends the conversation
        rt.confirm(&c);
        assert_eq!(rt.confirm(&c), DialogueSignal::Ended(EndReason::Completed));
        assert!(!rt.active);
        assert_eq!(rt.phase, DialoguePhase::Ended);
    }

    #[test]
    fn test_missing_choice_target_ends() {
        let c = content("hi");
        let mut rt = DialogueRuntime::default();
        rt.start(&c, "talk");
        rt.confirm(&c);
        rt.select_choice(&c, 1);
        assert_eq!(rt.selected_choice, 1);
        assert_eq!(
            rt.confirm(&c),
            DialogueSignal::Ended(EndReason::MissingNode("missing".into()))
        );
        assert!(!rt.active);
    }

    #[test]
    fn test_select_choice_wraps_and_requires_awaiting() {
        let c = content("hi");
        let mut rt = DialogueRuntime::default();
        rt.start(&c, "talk");
        rt.select_choice(&c, 1);
        assert_eq!(rt.selected_choice, 0);
        rt.confirm(&c);
        rt.select_choice(&c, -1);
        assert_eq!(rt.selected_choice, 1);
        rt.select_choice(&c, 1);
        assert_eq!(rt.selected_choice, 0);
    }

    #[test]
    fn test_unknown_conversation() {
        let c = content("hi");
        let mut rt = DialogueRuntime::default();
        assert_eq!(
            rt.start(&c, "nobody"),
            DialogueSignal::Ended(EndReason::MissingNode("nobody".into()))
        );
        assert!(!rt.active);
    }

    #[test]
    fn test_cancel_force_exits() {
        let c = content("hi");
        let mut rt = DialogueRuntime::default();
        rt.start(&c, "talk");
        assert_eq!(rt.cancel(), DialogueSignal::Ended(EndReason::ForceExit));
        assert!(!rt.active);
        assert_eq!(rt.current_node, None);
    }

    #[test]
    fn test_visible_text_respects_char_boundaries() {
        let mut c = content("héllo");
        c.conversations.insert("x".into(), "a".into());
        let mut rt = DialogueRuntime::default();
        rt.start(&c, "x");
        rt.update(2.0 / 30.0, 30.0);
        assert_eq!(rt.visible_text(&c), Some("hé"));
    }

    #[test]
    fn test_empty_text_finishes_on_first_update() {
        let c = content("");
        let mut rt = DialogueRuntime::default();
        rt.start(&c, "talk");
        let report = rt.update(0.0, 30.0);
        assert!(report.finished);
        assert!(!report.revealed_more);
        assert!(rt.awaiting_input());
    }

    #[test]
    fn test_demo_content_validation_flags_nothing_for_entries() {
        let demo = DialogueContent::demo().expect("demo dialogue");
        assert!(demo.validate().is_empty());
        let mut broken = demo.clone();
        broken.conversations.insert("ghost".into(), "nowhere".into());
        assert_eq!(broken.validate().len(), 1);
    }
}
