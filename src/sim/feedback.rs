//! Outbound cues for the presentation layer
//!
//! The simulation never draws or plays anything itself. It tells a
//! [`Feedback`] sink which animation an actor should show and which sounds to
//! start or stop, and carries on without waiting for any result. The sink is
//! passed in explicitly by whoever drives the tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::ActorId;

/// Animation an actor should display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimTag {
    #[default]
    Idle,
    Run,
    Walk,
    Jump,
    Fall,
    Attack,
    Hurt,
    Die,
}

impl AnimTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimTag::Idle => "idle",
            AnimTag::Run => "run",
            AnimTag::Walk => "walk",
            AnimTag::Jump => "jump",
            AnimTag::Fall => "fall",
            AnimTag::Attack => "attack",
            AnimTag::Hurt => "hurt",
            AnimTag::Die => "die",
        }
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player weapon fired
    Shot,
    /// Enemy attack swing
    Attack,
    /// Actor took damage
    Hurt,
    /// Actor died
    Death,
    /// Enemy spotted the player (screaming kinds)
    Scream,
    /// Enemy spotted the player (growling kinds)
    Growl,
}

/// Sink for animation and sound cues
pub trait Feedback {
    fn set_tag(&mut self, actor: ActorId, tag: AnimTag);
    fn play_sound(&mut self, sound: SoundEffect, at: Vec2);
    fn stop_sound(&mut self, sound: SoundEffect);
}

/// A recorded cue
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Tag { actor: ActorId, tag: AnimTag },
    PlaySound { sound: SoundEffect, at: Vec2 },
    StopSound { sound: SoundEffect },
}

/// Feedback sink that records cues for the frontend to drain each frame
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all recorded events
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Last tag recorded for an actor
    pub fn last_tag(&self, actor: ActorId) -> Option<AnimTag> {
        self.events.iter().rev().find_map(|e| match e {
            GameEvent::Tag { actor: a, tag } if *a == actor => Some(*tag),
            _ => None,
        })
    }

    pub fn played(&self, sound: SoundEffect) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::PlaySound { sound: s, .. } if *s == sound))
    }
}

impl Feedback for EventLog {
    fn set_tag(&mut self, actor: ActorId, tag: AnimTag) {
        self.events.push(GameEvent::Tag { actor, tag });
    }

    fn play_sound(&mut self, sound: SoundEffect, at: Vec2) {
        self.events.push(GameEvent::PlaySound { sound, at });
    }

    fn stop_sound(&mut self, sound: SoundEffect) {
        self.events.push(GameEvent::StopSound { sound });
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl Feedback for NullFeedback {
    fn set_tag(&mut self, _actor: ActorId, _tag: AnimTag) {}
    fn play_sound(&mut self, _sound: SoundEffect, _at: Vec2) {}
    fn stop_sound(&mut self, _sound: SoundEffect) {}
}
