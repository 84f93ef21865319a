//! Enemy AI state machine
//!
//! One controller drives every enemy; per-type differences are data in an
//! [`EnemyKind`] record. States:
//! - Bored: idle, rarely looks around, may grow Alert
//! - Alert: idle, looks around more often, may calm back to Bored
//! - Follow: walks toward the player's last seen position
//! - Attack: stands its ground for `attack_delay`, then strikes once
//! - MoveAround: stop-and-go walk back to its post (anchor)
//!
//! The controller runs after physics each tick. The direction it picks is
//! integrated on the next tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorId};
use super::body::{BodyTuning, Direction};
use super::collider::ColliderRegistry;
use super::feedback::{AnimTag, Feedback, SoundEffect};
use super::hitscan::{self, Target};
use super::rect::Rect;
use crate::consts::BATTLE_MODE_TIMEOUT;
use crate::{Timestamp, elapsed};

/// Behavior mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Bored,
    Alert,
    Follow,
    Attack,
    MoveAround,
}

impl AiState {
    /// Animation shown while in this state
    pub fn anim_tag(self) -> AnimTag {
        match self {
            AiState::Bored | AiState::Alert => AnimTag::Idle,
            AiState::Follow | AiState::MoveAround => AnimTag::Walk,
            AiState::Attack => AnimTag::Attack,
        }
    }

    /// Chasing the player right now
    pub fn is_engaged(self) -> bool {
        matches!(self, AiState::Follow | AiState::Attack)
    }
}

/// How the player was last perceived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSource {
    View,
    Sound,
}

/// Phase of the stop-and-go walk back to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WanderPhase {
    Moving,
    Waiting,
}

/// Immutable per-type enemy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyKind {
    pub name: String,
    pub size: Vec2,
    pub head_offset: f32,
    pub hitpoints: f32,
    pub body: BodyTuning,

    // === Perception ===
    pub view_distance: f32,
    /// View distance while already following
    pub alert_view_distance: f32,
    pub hear_distance: f32,
    /// A shot is audible for this many seconds; also how long a sound alert
    /// keeps a chase going without a fresh sighting
    pub hear_duration: f32,

    // === Attack ===
    /// Enter Attack when the player is closer than this
    pub attack_distance: f32,
    /// Reach of the strike hit-scan
    pub attack_range: f32,
    /// Seconds between entering Attack and the strike
    pub attack_delay: f32,
    pub attack_damage: f32,

    // === Idle behavior ===
    /// Minimum seconds in Bored/Alert before a random toggle
    pub min_state_duration: f32,
    /// Percent chance per tick Bored -> Alert
    pub alert_chance: u32,
    /// Percent chance per tick Alert -> Bored
    pub bored_chance: u32,
    /// Percent chance per tick of a look flip while Bored
    pub bored_look_chance: u32,
    /// Percent chance per tick of a look flip while Alert
    pub alert_look_chance: u32,
    /// Minimum seconds between look flips
    pub min_look_interval: f32,

    // === Movement ===
    /// Dead zone of the horizontal steering
    pub position_threshold: f32,
    /// After losing the player, walk back to the post instead of waiting
    pub wander_after_chase: bool,
    /// Spotting the player while walking back starts a chase (else Alert)
    pub chase_from_wander: bool,
    /// While walking back, only react to a player closer than this
    pub safety_distance: f32,
    /// Seconds of walking per stop-and-go cycle
    pub move_delay: f32,
    /// Seconds of standing per stop-and-go cycle
    pub stop_and_wait_delay: f32,
    /// Close enough to the post to stop correcting
    pub anchor_threshold: f32,

    // === Hooks ===
    /// Played when the enemy starts chasing
    pub alert_sound: Option<SoundEffect>,
    /// Remove immediately on death instead of leaving a corpse
    pub remove_on_death: bool,
    /// Seconds a corpse stays before removal
    pub corpse_linger: f32,
}

impl Default for EnemyKind {
    fn default() -> Self {
        Self::grunt()
    }
}

impl EnemyKind {
    /// Standard melee enemy that holds its position after losing the player
    pub fn grunt() -> Self {
        Self {
            name: "grunt".to_string(),
            size: Vec2::new(16.0, 32.0),
            head_offset: 6.0,
            hitpoints: 60.0,
            body: BodyTuning {
                max_speed: 90.0,
                acceleration: 600.0,
                deceleration: 900.0,
                jump_power: 300.0,
            },
            view_distance: 120.0,
            alert_view_distance: 200.0,
            hear_distance: 250.0,
            hear_duration: 1.0,
            attack_distance: 28.0,
            attack_range: 36.0,
            attack_delay: 0.6,
            attack_damage: 10.0,
            min_state_duration: 2.0,
            alert_chance: 2,
            bored_chance: 1,
            bored_look_chance: 1,
            alert_look_chance: 5,
            min_look_interval: 1.0,
            position_threshold: 4.0,
            wander_after_chase: false,
            chase_from_wander: true,
            safety_distance: 150.0,
            move_delay: 1.2,
            stop_and_wait_delay: 0.8,
            anchor_threshold: 8.0,
            alert_sound: Some(SoundEffect::Growl),
            remove_on_death: false,
            corpse_linger: 1.5,
        }
    }

    /// Fast, fragile, screams and walks back to its post after a chase
    pub fn screamer() -> Self {
        Self {
            name: "screamer".to_string(),
            hitpoints: 30.0,
            body: BodyTuning {
                max_speed: 130.0,
                acceleration: 900.0,
                deceleration: 900.0,
                jump_power: 300.0,
            },
            attack_damage: 6.0,
            attack_delay: 0.4,
            alert_chance: 4,
            alert_look_chance: 8,
            wander_after_chase: true,
            alert_sound: Some(SoundEffect::Scream),
            remove_on_death: true,
            ..Self::grunt()
        }
    }

    /// Slow, long-sighted lookout that never leaves its post on its own
    pub fn sentry() -> Self {
        Self {
            name: "sentry".to_string(),
            hitpoints: 100.0,
            body: BodyTuning {
                max_speed: 50.0,
                acceleration: 400.0,
                deceleration: 900.0,
                jump_power: 0.0,
            },
            view_distance: 260.0,
            alert_view_distance: 320.0,
            hear_distance: 150.0,
            attack_distance: 40.0,
            attack_range: 48.0,
            attack_delay: 1.0,
            attack_damage: 20.0,
            bored_look_chance: 3,
            alert_look_chance: 10,
            min_look_interval: 0.5,
            wander_after_chase: false,
            alert_sound: None,
            corpse_linger: 3.0,
            ..Self::grunt()
        }
    }

    /// All built-in kinds
    pub fn presets() -> Vec<EnemyKind> {
        vec![Self::grunt(), Self::screamer(), Self::sentry()]
    }
}

/// What the AI may know about the player this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub id: ActorId,
    pub pos: Vec2,
    pub head: Vec2,
    pub bounds: Rect,
    pub last_shot_at: Option<Timestamp>,
}

impl PlayerView {
    /// Snapshot of a live player; `None` for a dead one
    pub fn of(actor: &Actor) -> Option<Self> {
        actor.is_alive().then(|| Self {
            id: actor.id,
            pos: actor.pos(),
            head: actor.head(),
            bounds: actor.bounds(),
            last_shot_at: actor.last_shot_at,
        })
    }

    fn target(&self) -> Target {
        Target {
            id: self.id,
            bounds: self.bounds,
        }
    }
}

/// World state the AI reads during its update
#[derive(Debug, Clone, Copy)]
pub struct AiContext<'a> {
    pub now: Timestamp,
    pub player: Option<PlayerView>,
    pub colliders: &'a ColliderRegistry,
}

/// A resolved attack attempt, applied to the player by the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub attacker: ActorId,
    /// Hit-scan origin and direction
    pub origin: Vec2,
    pub delta: Vec2,
    pub damage: f32,
    /// Where the push-back comes from
    pub from: Vec2,
}

/// Last successful perception
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertMark {
    pub source: AlertSource,
    pub at: Timestamp,
}

/// Per-enemy AI state
#[derive(Debug, Clone)]
pub struct EnemyAi {
    state: AiState,
    /// Only meaningful while engaged or walking back
    target: Option<Vec2>,
    anchor: Vec2,
    last_state_change: Timestamp,
    last_look_change: Timestamp,
    alert: Option<AlertMark>,
    wander_phase: WanderPhase,
    move_started_at: Timestamp,
    wait_started_at: Timestamp,
}

impl EnemyAi {
    /// Fresh controller in Bored, posted at `anchor`
    pub fn new(anchor: Vec2, now: Timestamp) -> Self {
        Self {
            state: AiState::Bored,
            target: None,
            anchor,
            last_state_change: now,
            last_look_change: now,
            alert: None,
            wander_phase: WanderPhase::Moving,
            move_started_at: now,
            wait_started_at: now,
        }
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    /// Point of interest, if the current state trusts one
    pub fn target(&self) -> Option<Vec2> {
        match self.state {
            AiState::Follow | AiState::Attack | AiState::MoveAround => self.target,
            AiState::Bored | AiState::Alert => None,
        }
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn alert(&self) -> Option<AlertMark> {
        self.alert
    }

    pub fn wander_phase(&self) -> WanderPhase {
        self.wander_phase
    }

    /// Sight or hearing, confirmed by an unobstructed cast head to head.
    ///
    /// Hearing needs a recent shot within `hear_distance`; sight needs the
    /// enemy to face the player within `view_distance` (`alert_view_distance`
    /// while following). Either way the cast must reach the player first, so
    /// nothing is seen or heard through walls.
    pub fn can_see_or_hear(
        &self,
        me: &Actor,
        kind: &EnemyKind,
        player: &PlayerView,
        colliders: &ColliderRegistry,
        now: Timestamp,
    ) -> Option<AlertSource> {
        let eye = me.head();
        let dist_sq = eye.distance_squared(player.head);

        let heard = player
            .last_shot_at
            .is_some_and(|at| elapsed(now, at) <= kind.hear_duration)
            && dist_sq < kind.hear_distance * kind.hear_distance;

        let view = if self.state == AiState::Follow {
            kind.alert_view_distance
        } else {
            kind.view_distance
        };
        let seen = me.is_facing(player.head) && dist_sq < view * view;

        if !seen && !heard {
            return None;
        }

        let hit = hitscan::cast_default(eye, player.head - eye, &[player.target()], colliders);
        if hit.and_then(|h| h.actor()) != Some(player.id) {
            return None;
        }

        Some(if seen { AlertSource::View } else { AlertSource::Sound })
    }

    /// Run one decision step. Returns a strike when an attack resolves.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        me: &mut Actor,
        kind: &EnemyKind,
        ctx: &AiContext<'_>,
        rng: &mut R,
        fx: &mut dyn Feedback,
    ) -> Option<Strike> {
        let now = ctx.now;
        let perceived = ctx.player.and_then(|player| {
            let source = self.can_see_or_hear(me, kind, &player, ctx.colliders, now)?;
            self.alert = Some(AlertMark { source, at: now });
            Some(player)
        });

        let mut strike = None;

        match self.state {
            AiState::Bored => {
                if let Some(player) = perceived {
                    self.start_follow(me, kind, &player, now, fx);
                } else if self.idle_toggle_due(kind, kind.alert_chance, now, rng) {
                    self.enter(AiState::Alert, me, now, fx);
                } else {
                    self.look_around(me, kind, kind.bored_look_chance, now, rng);
                }
            }
            AiState::Alert => {
                if let Some(player) = perceived {
                    self.start_follow(me, kind, &player, now, fx);
                } else if self.idle_toggle_due(kind, kind.bored_chance, now, rng) {
                    self.enter(AiState::Bored, me, now, fx);
                } else {
                    self.look_around(me, kind, kind.alert_look_chance, now, rng);
                }
            }
            AiState::Follow => match perceived {
                Some(player) => {
                    self.target = Some(player.pos);
                    let reach = kind.attack_distance * kind.attack_distance;
                    if me.pos().distance_squared(player.pos) < reach {
                        me.mirrored = player.pos.x < me.pos().x;
                        self.enter(AiState::Attack, me, now, fx);
                    }
                }
                None if self.sound_alert_fresh(kind, now) => {}
                None => self.lose_player(me, kind, now, fx),
            },
            AiState::Attack => {
                if elapsed(now, self.last_state_change) >= kind.attack_delay {
                    strike = self.resolve_attack(me, kind, ctx.player, now, fx);
                    self.enter(AiState::Follow, me, now, fx);
                }
            }
            AiState::MoveAround => {
                let close = perceived.filter(|player| {
                    me.pos().distance_squared(player.pos) < kind.safety_distance * kind.safety_distance
                });
                match close {
                    Some(player) if kind.chase_from_wander => self.start_follow(me, kind, &player, now, fx),
                    Some(_) => self.enter(AiState::Alert, me, now, fx),
                    None => self.wander(me, kind, now, fx),
                }
            }
        }

        self.steer(me, kind);
        strike
    }

    fn enter(&mut self, state: AiState, me: &mut Actor, now: Timestamp, fx: &mut dyn Feedback) {
        log::debug!("enemy {}: {:?} -> {:?}", me.id, self.state, state);
        self.state = state;
        self.last_state_change = now;

        match state {
            AiState::Bored | AiState::Alert => self.target = None,
            AiState::MoveAround => {
                self.wander_phase = WanderPhase::Moving;
                self.move_started_at = now;
                self.target = Some(self.anchor);
            }
            AiState::Follow | AiState::Attack => {}
        }

        me.cue(state.anim_tag(), fx);
    }

    fn start_follow(&mut self, me: &mut Actor, kind: &EnemyKind, player: &PlayerView, now: Timestamp, fx: &mut dyn Feedback) {
        let was_engaged = self.state.is_engaged();
        self.enter(AiState::Follow, me, now, fx);
        self.target = Some(player.pos);

        if !was_engaged {
            if let Some(sound) = kind.alert_sound {
                fx.play_sound(sound, me.head());
            }
        }
    }

    fn lose_player(&mut self, me: &mut Actor, kind: &EnemyKind, now: Timestamp, fx: &mut dyn Feedback) {
        let next = if kind.wander_after_chase {
            AiState::MoveAround
        } else {
            AiState::Alert
        };
        self.enter(next, me, now, fx);
    }

    fn sound_alert_fresh(&self, kind: &EnemyKind, now: Timestamp) -> bool {
        self.alert
            .is_some_and(|a| a.source == AlertSource::Sound && elapsed(now, a.at) <= kind.hear_duration)
    }

    fn idle_toggle_due<R: Rng + ?Sized>(&self, kind: &EnemyKind, chance: u32, now: Timestamp, rng: &mut R) -> bool {
        elapsed(now, self.last_state_change) >= kind.min_state_duration && roll(rng, chance)
    }

    fn look_around<R: Rng + ?Sized>(&mut self, me: &mut Actor, kind: &EnemyKind, chance: u32, now: Timestamp, rng: &mut R) {
        if elapsed(now, self.last_look_change) >= kind.min_look_interval && roll(rng, chance) {
            me.mirrored = !me.mirrored;
            self.last_look_change = now;
        }
    }

    fn resolve_attack(
        &self,
        me: &mut Actor,
        kind: &EnemyKind,
        player: Option<PlayerView>,
        now: Timestamp,
        fx: &mut dyn Feedback,
    ) -> Option<Strike> {
        let player = player?;
        let origin = me.head();
        let delta = (player.head - origin).normalize_or_zero() * kind.attack_range;

        me.battle.enter(now, BATTLE_MODE_TIMEOUT);
        fx.play_sound(SoundEffect::Attack, origin);

        Some(Strike {
            attacker: me.id,
            origin,
            delta,
            damage: kind.attack_damage,
            from: me.center(),
        })
    }

    /// Stop-and-go walk toward the anchor
    fn wander(&mut self, me: &mut Actor, kind: &EnemyKind, now: Timestamp, fx: &mut dyn Feedback) {
        if (me.pos().x - self.anchor.x).abs() <= kind.anchor_threshold {
            self.target = None;
            me.cue(AnimTag::Idle, fx);
            return;
        }

        match self.wander_phase {
            WanderPhase::Moving => {
                if elapsed(now, self.move_started_at) >= kind.move_delay {
                    self.wander_phase = WanderPhase::Waiting;
                    self.wait_started_at = now;
                    self.target = None;
                    me.cue(AnimTag::Idle, fx);
                } else {
                    self.target = Some(self.anchor);
                }
            }
            WanderPhase::Waiting => {
                if elapsed(now, self.wait_started_at) >= kind.stop_and_wait_delay {
                    self.wander_phase = WanderPhase::Moving;
                    self.move_started_at = now;
                    self.target = Some(self.anchor);
                    me.cue(AnimTag::Walk, fx);
                } else {
                    self.target = None;
                }
            }
        }
    }

    /// Bang-bang horizontal steering toward the trusted target
    fn steer(&self, me: &mut Actor, kind: &EnemyKind) {
        let direction = match self.target() {
            Some(t) if me.pos().x > t.x + kind.position_threshold => Direction::Left,
            Some(t) if me.pos().x < t.x - kind.position_threshold => Direction::Right,
            _ => Direction::Idle,
        };
        me.set_direction(direction);
    }
}

/// Bernoulli trial: uniform 1..=100 below `chance_percent`
#[inline]
pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance_percent: u32) -> bool {
    rng.random_range(1..=100u32) < chance_percent
}
