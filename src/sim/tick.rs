//! Per-frame simulation tick
//!
//! Order within a tick:
//! 1. clock advance and player input
//! 2. physics for every actor
//! 3. battle mode expiry and the player's shot
//! 4. enemy AI on the post-physics positions
//! 5. enemy strikes, then corpse cleanup
//!
//! AI runs after physics, so a direction it picks takes effect next tick.

use glam::Vec2;

use super::actor::{ActorId, Role};
use super::ai::{AiContext, PlayerView, Strike};
use super::body::{BodyStep, Direction};
use super::feedback::Feedback;
use super::hitscan::{self, Hit};
use super::world::World;
use crate::consts::MAX_DT;
use crate::{Timestamp, elapsed};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal intent
    pub direction: Direction,
    /// Jump (only takes if grounded)
    pub jump: bool,
    /// Fire along this aim direction (zero aims where the player faces)
    pub shoot: Option<Vec2>,
    /// Bring a dead player back at the spawn point
    pub respawn: bool,
}

/// One resolved hit-scan attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotReport {
    pub shooter: ActorId,
    pub hit: Option<Hit>,
    pub point: Option<Vec2>,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    pub shots: Vec<ShotReport>,
    /// Actors that died this tick
    pub killed: Vec<ActorId>,
    /// Enemies removed from the world this tick
    pub removed: Vec<ActorId>,
    pub respawned: Option<ActorId>,
    /// The player's physics step
    pub player_motion: BodyStep,
}

/// Advance the world by `dt` seconds (clamped to `[0, MAX_DT]`)
pub fn tick(world: &mut World, input: &TickInput, dt: f32, fx: &mut dyn Feedback) -> TickSummary {
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };
    world.advance_clock(dt);
    let now = world.now;
    let mut summary = TickSummary::default();

    if input.respawn && !world.player.is_alive() {
        summary.respawned = Some(world.respawn_player(fx));
    }

    world.player.set_direction(input.direction);
    if input.jump {
        world.player.jump(1.0);
    }

    // Physics
    summary.player_motion = world.player.step(dt, &world.colliders);
    for enemy in &mut world.enemies {
        enemy.actor.step(dt, &world.colliders);
    }

    if world.player.is_alive() {
        let tag = world.player.motion_tag();
        world.player.cue(tag, fx);
    }

    if world.player.battle.update(now) {
        log::debug!("player left battle mode");
    }
    for enemy in &mut world.enemies {
        enemy.actor.battle.update(now);
    }

    if let Some(aim) = input.shoot {
        player_shoot(world, aim, now, fx, &mut summary);
    }

    // Enemy AI
    let ctx = AiContext {
        now,
        player: PlayerView::of(&world.player),
        colliders: &world.colliders,
    };
    let mut strikes = Vec::new();
    for enemy in world.enemies.iter_mut().filter(|e| e.actor.is_alive()) {
        if let Some(strike) = enemy.ai.update(&mut enemy.actor, &enemy.kind, &ctx, &mut world.rng, fx) {
            strikes.push(strike);
        }
    }

    for strike in &strikes {
        resolve_strike(world, strike, now, fx, &mut summary);
    }

    remove_corpses(world, now, &mut summary);
    summary
}

/// Fire the player's weapon and apply the hit
fn player_shoot(world: &mut World, aim: Vec2, now: Timestamp, fx: &mut dyn Feedback, summary: &mut TickSummary) {
    let weapon = world.player_tuning.weapon;
    let player = &mut world.player;
    if !player.try_shoot(&weapon, now, fx) {
        return;
    }

    if aim.x < 0.0 {
        player.mirrored = true;
    } else if aim.x > 0.0 {
        player.mirrored = false;
    }
    let dir = aim.try_normalize().unwrap_or(Vec2::new(player.facing_sign(), 0.0));
    let shooter = player.id;
    let origin = player.head();
    let from = player.center();

    let targets = world.opponents_of(Role::Player);
    let hit = hitscan::cast_default(origin, dir * weapon.range, &targets, &world.colliders);
    summary.shots.push(ShotReport {
        shooter,
        hit: hit.map(|h| h.hit),
        point: hit.map(|h| h.point),
    });

    let Some(id) = hit.and_then(|h| h.actor()) else {
        return;
    };
    if let Some(enemy) = world.enemy_mut(id) {
        if enemy.actor.hurt(weapon.damage, from, now, fx) {
            if let Some(sound) = enemy.kind.alert_sound {
                fx.stop_sound(sound);
            }
            log::info!("{} #{} killed", enemy.kind.name, id);
            summary.killed.push(id);
        }
    }
}

/// Cast an enemy attack at the player and apply the damage
fn resolve_strike(world: &mut World, strike: &Strike, now: Timestamp, fx: &mut dyn Feedback, summary: &mut TickSummary) {
    let targets = world.opponents_of(Role::Enemy);
    let hit = hitscan::cast_default(strike.origin, strike.delta, &targets, &world.colliders);
    summary.shots.push(ShotReport {
        shooter: strike.attacker,
        hit: hit.map(|h| h.hit),
        point: hit.map(|h| h.point),
    });

    if hit.and_then(|h| h.actor()) == Some(world.player.id) && world.player.hurt(strike.damage, strike.from, now, fx) {
        log::info!("player #{} killed by #{}", world.player.id, strike.attacker);
        summary.killed.push(world.player.id);
    }
}

/// Drop dead enemies whose corpse time is up
fn remove_corpses(world: &mut World, now: Timestamp, summary: &mut TickSummary) {
    let mut removed = Vec::new();
    world.enemies.retain(|enemy| {
        let keep = match enemy.actor.died_at {
            None => true,
            Some(at) => !enemy.kind.remove_on_death && elapsed(now, at) < enemy.kind.corpse_linger,
        };
        if !keep {
            removed.push(enemy.actor.id);
        }
        keep
    });
    for id in &removed {
        log::debug!("removed enemy #{}", id);
    }
    summary.removed = removed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::ai::{AiState, EnemyKind};
    use crate::sim::body::BodyTuning;
    use crate::sim::collider::ColliderRegistry;
    use crate::sim::feedback::{AnimTag, EventLog, GameEvent, NullFeedback, SoundEffect};
    use crate::sim::rect::Rect;
    use crate::tuning::PlayerTuning;

    /// Grunt with all random behavior switched off
    fn calm() -> EnemyKind {
        EnemyKind {
            alert_chance: 0,
            bored_chance: 0,
            bored_look_chance: 0,
            alert_look_chance: 0,
            ..EnemyKind::grunt()
        }
    }

    /// Calm grunt that cannot walk
    fn rooted() -> EnemyKind {
        EnemyKind {
            body: BodyTuning {
                max_speed: 0.0,
                ..BodyTuning::default()
            },
            ..calm()
        }
    }

    fn floor() -> ColliderRegistry {
        ColliderRegistry::new([Rect::new(-1000.0, 100.0, 2000.0, 20.0)])
    }

    /// World with a floor, the player dropped in at `player_x`
    fn floor_world(player_x: f32) -> World {
        World::new(5, floor(), Vec2::new(player_x, 60.0), PlayerTuning::default())
    }

    fn settle(world: &mut World) {
        for _ in 0..60 {
            tick(world, &TickInput::default(), SIM_DT, &mut NullFeedback);
        }
    }

    #[test]
    fn test_enemy_spots_player_in_front() {
        let mut world = World::new(1, ColliderRegistry::empty(), Vec2::new(50.0, 0.0), PlayerTuning::default());
        let id = world.spawn_enemy(EnemyKind::grunt(), Vec2::new(0.0, 0.0), false);
        let mut log = EventLog::new();

        tick(&mut world, &TickInput::default(), SIM_DT, &mut log);

        let enemy = world.enemy(id).expect("enemy exists");
        assert_eq!(enemy.ai.state(), AiState::Follow);
        let target = enemy.ai.target().expect("following has a target");
        assert!(target.distance(Vec2::new(50.0, 0.0)) < 1.0);
        assert!(log.played(SoundEffect::Growl));
    }

    #[test]
    fn test_wall_hides_player() {
        let colliders = ColliderRegistry::new([Rect::new(-1000.0, 100.0, 2000.0, 20.0), Rect::new(40.0, 0.0, 4.0, 100.0)]);
        let mut world = World::new(1, colliders, Vec2::new(80.0, 60.0), PlayerTuning::default());
        let id = world.spawn_enemy(calm(), Vec2::new(0.0, 60.0), false);

        for _ in 0..120 {
            tick(&mut world, &TickInput::default(), SIM_DT, &mut NullFeedback);
        }
        assert_eq!(world.enemy(id).map(|e| e.ai.state()), Some(AiState::Bored));
    }

    #[test]
    fn test_jump_from_ground() {
        let mut world = floor_world(0.0);
        settle(&mut world);
        assert!(world.player.body.on_ground);

        let mut log = EventLog::new();
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut world, &input, SIM_DT, &mut log);

        let body = &world.player.body;
        assert!(body.vel.y < 0.0);
        assert!(body.jumping);
        assert!(!body.on_ground);
        assert_eq!(log.last_tag(world.player.id), Some(AnimTag::Jump));

        // No double jump
        let vy = world.player.body.vel.y;
        tick(&mut world, &input, SIM_DT, &mut NullFeedback);
        assert!(world.player.body.vel.y > vy);
    }

    #[test]
    fn test_summary_reports_landing() {
        let mut world = floor_world(0.0);
        settle(&mut world);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let summary = tick(&mut world, &jump, SIM_DT, &mut NullFeedback);
        assert!(summary.player_motion.moved);
        assert!(!summary.player_motion.landed);

        let landing = (0..120)
            .map(|_| tick(&mut world, &TickInput::default(), SIM_DT, &mut NullFeedback))
            .position(|s| s.player_motion.landed);
        assert!(landing.is_some());
        assert!(world.player.body.on_ground);
    }

    #[test]
    fn test_run_cues_animation() {
        let mut world = floor_world(0.0);
        settle(&mut world);
        let mut log = EventLog::new();
        let input = TickInput {
            direction: Direction::Left,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut world, &input, SIM_DT, &mut log);
        }
        assert!(world.player.pos().x < 0.0);
        assert!(world.player.mirrored);
        assert!(world.player.body.on_ground);
        assert_eq!(log.last_tag(world.player.id), Some(AnimTag::Run));
    }

    #[test]
    fn test_player_shoots_enemy_dead() {
        let mut world = floor_world(0.0);
        let id = world.spawn_enemy(EnemyKind::grunt(), Vec2::new(150.0, 60.0), false);
        settle(&mut world);

        let mut log = EventLog::new();
        let input = TickInput {
            shoot: Some(Vec2::X),
            ..Default::default()
        };
        let mut killed = false;
        for _ in 0..60 {
            let summary = tick(&mut world, &input, SIM_DT, &mut log);
            if summary.killed.contains(&id) {
                killed = true;
                break;
            }
        }

        assert!(killed, "three hits kill a grunt");
        let enemy = world.enemy(id).expect("grunt corpses linger");
        assert!(!enemy.actor.is_alive());
        assert!(log.events.contains(&GameEvent::StopSound { sound: SoundEffect::Growl }));
        assert!(log.played(SoundEffect::Death));
        assert!(world.player.battle.is_active());

        let mut removed = false;
        for _ in 0..120 {
            let summary = tick(&mut world, &TickInput::default(), SIM_DT, &mut NullFeedback);
            if summary.removed.contains(&id) {
                removed = true;
                break;
            }
        }
        assert!(removed);
        assert!(world.enemy(id).is_none());
    }

    #[test]
    fn test_remove_on_death_same_tick() {
        let mut world = floor_world(0.0);
        let id = world.spawn_enemy(EnemyKind::screamer(), Vec2::new(150.0, 60.0), false);
        settle(&mut world);

        let now = world.now();
        if let Some(e) = world.enemy_mut(id) {
            e.actor.hurt(1000.0, Vec2::ZERO, now, &mut NullFeedback);
        }
        let summary = tick(&mut world, &TickInput::default(), SIM_DT, &mut NullFeedback);
        assert_eq!(summary.removed, vec![id]);
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn test_shot_into_wall() {
        let colliders = ColliderRegistry::new([Rect::new(-1000.0, 100.0, 2000.0, 20.0), Rect::new(60.0, 0.0, 4.0, 100.0)]);
        let mut world = World::new(1, colliders, Vec2::new(0.0, 60.0), PlayerTuning::default());
        let id = world.spawn_enemy(calm(), Vec2::new(120.0, 60.0), true);
        settle(&mut world);

        let input = TickInput {
            shoot: Some(Vec2::X),
            ..Default::default()
        };
        let summary = tick(&mut world, &input, SIM_DT, &mut NullFeedback);
        assert_eq!(summary.shots.len(), 1);
        assert_eq!(summary.shots[0].hit, Some(Hit::Collider(1)));
        assert_eq!(world.enemy(id).map(|e| e.actor.hitpoints()), Some(EnemyKind::grunt().hitpoints));
    }

    #[test]
    fn test_enemy_strikes_player() {
        let mut world = floor_world(0.0);
        let kind = rooted();
        let damage = kind.attack_damage;
        let id = world.spawn_enemy(kind, Vec2::new(20.0, 60.0), true);
        settle(&mut world);

        let mut log = EventLog::new();
        let mut struck = false;
        for _ in 0..90 {
            let summary = tick(&mut world, &TickInput::default(), SIM_DT, &mut log);
            let player = world.player.id;
            if summary.shots.iter().any(|s| s.shooter == id && s.hit == Some(Hit::Actor(player))) {
                struck = true;
                break;
            }
        }

        assert!(struck);
        assert!(world.player.hitpoints() <= world.player_tuning.hitpoints - damage);
        assert!(log.played(SoundEffect::Attack));
        assert!(log.played(SoundEffect::Hurt));
    }

    #[test]
    fn test_dead_player_is_forgotten_and_respawns() {
        let mut world = floor_world(0.0);
        let id = world.spawn_enemy(rooted(), Vec2::new(60.0, 60.0), true);
        settle(&mut world);
        assert_eq!(world.enemy(id).map(|e| e.ai.state()), Some(AiState::Follow));

        let old = world.player.id;
        let now = world.now();
        world.player.hurt(1000.0, Vec2::ZERO, now, &mut NullFeedback);
        tick(&mut world, &TickInput::default(), SIM_DT, &mut NullFeedback);
        assert_eq!(world.enemy(id).map(|e| e.ai.state()), Some(AiState::Alert));
        assert!(world.live_actors(Role::Player).is_empty());

        // Dead players cannot act
        let input = TickInput {
            direction: Direction::Right,
            jump: true,
            shoot: Some(Vec2::X),
            respawn: false,
        };
        let summary = tick(&mut world, &input, SIM_DT, &mut NullFeedback);
        assert!(summary.shots.is_empty());
        assert_eq!(world.player.body.direction, Direction::Idle);

        let input = TickInput {
            respawn: true,
            ..Default::default()
        };
        let summary = tick(&mut world, &input, SIM_DT, &mut NullFeedback);
        assert!(summary.respawned.is_some_and(|new| new != old));
        assert!(world.player.is_alive());

        // Respawning a live player is a no-op
        let summary = tick(&mut world, &input, SIM_DT, &mut NullFeedback);
        assert_eq!(summary.respawned, None);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut world = floor_world(0.0);
        tick(&mut world, &TickInput::default(), 5.0, &mut NullFeedback);
        assert!((world.now() - MAX_DT as f64).abs() < 1e-6);
        tick(&mut world, &TickInput::default(), -1.0, &mut NullFeedback);
        tick(&mut world, &TickInput::default(), f32::NAN, &mut NullFeedback);
        assert!((world.now() - MAX_DT as f64).abs() < 1e-6);
        assert_eq!(world.time_ticks, 3);
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed should produce identical results
        let build = || {
            let mut world = floor_world(0.0);
            world.spawn_enemy(EnemyKind::grunt(), Vec2::new(200.0, 60.0), true);
            world.spawn_enemy(EnemyKind::screamer(), Vec2::new(-180.0, 60.0), false);
            world.spawn_enemy(EnemyKind::sentry(), Vec2::new(400.0, 60.0), true);
            world
        };
        let mut world1 = build();
        let mut world2 = build();

        for frame in 0..600u32 {
            let input = TickInput {
                direction: if frame % 200 < 100 { Direction::Right } else { Direction::Left },
                jump: frame % 90 == 0,
                shoot: (frame % 45 == 0).then_some(Vec2::new(if frame % 2 == 0 { 1.0 } else { -1.0 }, 0.0)),
                respawn: true,
            };
            let s1 = tick(&mut world1, &input, SIM_DT, &mut NullFeedback);
            let s2 = tick(&mut world2, &input, SIM_DT, &mut NullFeedback);
            assert_eq!(s1, s2);
        }

        assert_eq!(world1.player.pos(), world2.player.pos());
        assert_eq!(world1.enemies.len(), world2.enemies.len());
        for (a, b) in world1.enemies.iter().zip(&world2.enemies) {
            assert_eq!(a.actor.pos(), b.actor.pos());
            assert_eq!(a.ai.state(), b.ai.state());
        }
    }
}
