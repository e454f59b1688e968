//! Audio boundary
//!
//! The core never plays sound itself. It queues fire-and-forget cues that the
//! frame loop hands to an external `AudioSink` once per frame.

use serde::{Deserialize, Serialize};

use crate::settings::AudioSettings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    /// Projectile or contact hit landed
    Hit,
    /// Entity touched down on a platform or the baseline
    Land,
    /// Projectile fired
    Shoot,
    /// Dialogue revealed more characters this frame
    TypingTick,
    /// Dialogue typing finished or was skipped
    TypingStop,
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::Hit => "hit",
            AudioCue::Land => "land",
            AudioCue::Shoot => "shoot",
            AudioCue::TypingTick => "typing_tick",
            AudioCue::TypingStop => "typing_stop",
        }
    }
}

/// External audio collaborator. Must not block on playback.
pub trait AudioSink {
    fn cue(&mut self, cue: AudioCue, volume: f32);
}

/// Sink that drops every cue
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn cue(&mut self, _cue: AudioCue, _volume: f32) {}
}

/// Sink that logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: u64,
}

impl AudioSink for LogAudio {
    fn cue(&mut self, cue: AudioCue, volume: f32) {
        self.played += 1;
        log::debug!("audio cue {} @ {:.2}", cue.as_str(), volume);
    }
}

/// Per-frame cue queue owned by the frame loop
#[derive(Debug, Clone, Default)]
pub struct CueQueue {
    cues: Vec<AudioCue>,
}

impl CueQueue {
    pub fn push(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    pub fn as_slice(&self) -> &[AudioCue] {
        &self.cues
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn clear(&mut self) {
        self.cues.clear();
    }

    /// Hand every queued cue to the sink, respecting volume settings
    pub fn flush(&mut self, sink: &mut dyn AudioSink, settings: &AudioSettings) {
        let vol = settings.effective_volume();
        if vol > 0.0 {
            for cue in &self.cues {
                sink.cue(*cue, vol);
            }
        }
        self.cues.clear();
    }
}
