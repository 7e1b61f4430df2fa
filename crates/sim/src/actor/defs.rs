use rand::Rng;

use super::state::{change_state, damage_actor, ActorState};
use super::{Actor, ActorFlags, ActorId, ActorInfo, ActorKind, Damage, Drop, Health, ItemInfo};
use crate::cardinal::{vector_to_cardinal, Cardinal};
use crate::controls::{Control, ControlSnapshot};
use crate::coord::{adjacent_tile, tile_center, Position, SCALED_TILE_SIZE, TILE_SIZE};
use crate::geometry::{lerp_epsilon, Rgb, Vec2};
use crate::sprite::SpriteId;
use crate::world::WorldCtx;

const PLAYER_SPEED: f32 = 2.5 * SCALED_TILE_SIZE as f32;
const STICK_DEADZONE: f32 = 0.2;
/// How quickly commanded velocity takes over, per second.
const PLAYER_ACCEL_RATE: f32 = 10.0;
const PLAYER_FRICTION: f32 = 0.5;
const PLAYER_FRICTION_EPSILON: f32 = 0.2;

/// 200 ms and 100 ms at the 30 Hz tick rate.
const WIND_UP_TICKS: i32 = 6;
const STRIKE_POSE_TICKS: i32 = 3;
/// Long enough for one contact pass before the hit volume dies.
const STRIKE_LIFETIME_TICKS: i32 = 2;

/// Butterfly retrigger window, 100–1000 ms in ticks.
const FLUTTER_MIN_TICKS: i32 = 3;
const FLUTTER_MAX_TICKS: i32 = 30;
const FLUTTER_SPEED: f32 = 0.25 * SCALED_TILE_SIZE as f32;

pub static PLAYER_STAND: ActorState = ActorState {
    sprite: Some(SpriteId::PlayerStand),
    handle_input: Some(player_handle_input),
    update: Some(player_stand_update),
    contact: Some(player_contact),
    ..ActorState::EMPTY
};

pub static PLAYER_RUN: ActorState = ActorState {
    sprite: Some(SpriteId::PlayerWalk),
    handle_input: Some(player_handle_input),
    update: Some(player_walk_update),
    contact: Some(player_contact),
    ..ActorState::EMPTY
};

static PLAYER_STRIKE: ActorState = ActorState {
    duration_ticks: STRIKE_POSE_TICKS,
    next_state: Some(&PLAYER_STAND),
    sprite: Some(SpriteId::PlayerStrike),
    on_exit: Some(player_strike),
    ..ActorState::EMPTY
};

static PLAYER_WIND_UP: ActorState = ActorState {
    duration_ticks: WIND_UP_TICKS,
    next_state: Some(&PLAYER_STRIKE),
    sprite: Some(SpriteId::PlayerSwing),
    ..ActorState::EMPTY
};

static BUTTERFLY_FLUTTER: ActorState = ActorState {
    sprite: Some(SpriteId::Butterfly),
    update: Some(butterfly_update),
    ..ActorState::EMPTY
};

/// The melee hit volume. Terminal: lives a moment, contacts whatever
/// overlaps, then the elapsed timer kills it.
static HAND_STRIKE: ActorState = ActorState {
    duration_ticks: STRIKE_LIFETIME_TICKS,
    contact: Some(strike_contact),
    ..ActorState::EMPTY
};

static TREE_DROPS: [Drop; 3] = [
    Drop {
        quantity: 1,
        kind: ActorKind::Log,
    },
    Drop {
        quantity: 2,
        kind: ActorKind::Sticks,
    },
    Drop {
        quantity: 3,
        kind: ActorKind::Leaves,
    },
];

struct ActorDef {
    flags: ActorFlags,
    state: Option<&'static ActorState>,
    sprite: Option<SpriteId>,
    hitbox_width: u8,
    hitbox_height: u8,
    health: Health,
    damage: Damage,
    info: ActorInfo,
}

impl ActorDef {
    const EMPTY: ActorDef = ActorDef {
        flags: ActorFlags::NONE,
        state: None,
        sprite: None,
        hitbox_width: 0,
        hitbox_height: 0,
        health: Health {
            amount: 0,
            minimum_damage_level: 0,
        },
        damage: Damage {
            level: 0,
            amount: 0,
        },
        info: ActorInfo::None,
    };
}

/// An actor kind's definition: the template copied when a new actor of
/// that kind is created.
fn definition(kind: ActorKind) -> ActorDef {
    match kind {
        ActorKind::Player => ActorDef {
            flags: ActorFlags::DIRECTIONAL
                | ActorFlags::ANIMATED
                | ActorFlags::CAN_BE_DAMAGED
                | ActorFlags::CASTS_SHADOW,
            state: Some(&PLAYER_STAND),
            hitbox_width: 5,
            hitbox_height: 4,
            health: Health {
                amount: 100,
                minimum_damage_level: 0,
            },
            info: ActorInfo::Player(Box::default()),
            ..ActorDef::EMPTY
        },
        ActorKind::HandStrike => ActorDef {
            state: Some(&HAND_STRIKE),
            hitbox_width: TILE_SIZE as u8,
            hitbox_height: TILE_SIZE as u8,
            damage: Damage {
                level: 0,
                amount: 10,
            },
            ..ActorDef::EMPTY
        },
        ActorKind::Tree => ActorDef {
            flags: ActorFlags::SOLID
                | ActorFlags::CAN_BE_DAMAGED
                | ActorFlags::DROPS_ITEMS
                | ActorFlags::CASTS_SHADOW,
            sprite: Some(SpriteId::Tree),
            hitbox_width: 4,
            hitbox_height: 4,
            health: Health {
                amount: 30,
                minimum_damage_level: 0,
            },
            info: ActorInfo::Drops(&TREE_DROPS),
            ..ActorDef::EMPTY
        },
        ActorKind::Bush => ActorDef {
            flags: ActorFlags::SOLID
                | ActorFlags::CAN_BE_DAMAGED
                | ActorFlags::DROPS_ITEMS
                | ActorFlags::CASTS_SHADOW,
            sprite: Some(SpriteId::Bush),
            hitbox_width: 4,
            hitbox_height: 4,
            health: Health {
                amount: 30,
                minimum_damage_level: 0,
            },
            info: ActorInfo::Drops(&[]),
            ..ActorDef::EMPTY
        },
        ActorKind::Butterfly => ActorDef {
            flags: ActorFlags::ANIMATED
                | ActorFlags::FLY
                | ActorFlags::NON_INTERACTIVE
                | ActorFlags::CASTS_SHADOW,
            state: Some(&BUTTERFLY_FLUTTER),
            info: ActorInfo::Timer(0),
            ..ActorDef::EMPTY
        },
        ActorKind::Log => ActorDef {
            flags: ActorFlags::COLLECTIBLE,
            sprite: Some(SpriteId::LogWorld),
            info: ActorInfo::Item(ItemInfo {
                width: 2,
                height: 2,
                sideways: false,
                sprite: SpriteId::LogInventory,
            }),
            ..ActorDef::EMPTY
        },
        ActorKind::Leaves => ActorDef {
            flags: ActorFlags::COLLECTIBLE,
            sprite: Some(SpriteId::Leaves),
            info: ActorInfo::Item(ItemInfo {
                width: 1,
                height: 1,
                sideways: false,
                sprite: SpriteId::Leaves,
            }),
            ..ActorDef::EMPTY
        },
        ActorKind::Sticks => ActorDef {
            flags: ActorFlags::COLLECTIBLE,
            sprite: Some(SpriteId::SticksWorld),
            info: ActorInfo::Item(ItemInfo {
                width: 1,
                height: 2,
                sideways: false,
                sprite: SpriteId::SticksInventory,
            }),
            ..ActorDef::EMPTY
        },
    }
}

/// Instantiate an actor of `kind` at `position` from its definition. A
/// zero hitbox dimension resolves to the sprite size here, once.
pub(crate) fn build_actor(id: ActorId, kind: ActorKind, position: Position) -> Actor {
    let def = definition(kind);

    let mut actor = Actor {
        id,
        kind,
        flags: def.flags,
        position,
        velocity: Vec2::ZERO,
        z: 0,
        direction: Cardinal::South,
        facing: None,
        health: def.health,
        damage: def.damage,
        sprite: def.sprite,
        current_frame: 0.0,
        lighting: Rgb::new(255.0, 255.0, 255.0),
        hitbox_width: def.hitbox_width,
        hitbox_height: def.hitbox_height,
        state: def.state,
        state_timer: def.state.map_or(0, |state| state.duration_ticks),
        info: def.info,
    };

    if let Some(sprite) = actor.sprite() {
        if actor.hitbox_width == 0 {
            actor.hitbox_width = sprite.location.w as u8;
        }
        if actor.hitbox_height == 0 {
            actor.hitbox_height = sprite.location.h as u8;
        }
    }

    actor
}

// --- input ---

fn player_handle_input(
    player: &mut Actor,
    ctx: &mut WorldCtx<'_>,
    controls: &ControlSnapshot,
    dt: f32,
) {
    // Start off with the value from the stick, let digital controls
    // override per axis.
    let mut move_dir = controls.left_stick();

    if controls.is_down(Control::MoveUp) {
        move_dir.y = -1.0;
    }
    if controls.is_down(Control::MoveDown) {
        move_dir.y = 1.0;
    }
    if controls.is_down(Control::MoveLeft) {
        move_dir.x = -1.0;
    }
    if controls.is_down(Control::MoveRight) {
        move_dir.x = 1.0;
    }

    // Stick: make it easier to go exactly east/west and north/south.
    if move_dir.x.abs() < STICK_DEADZONE {
        move_dir.x = 0.0;
    }
    if move_dir.y.abs() < STICK_DEADZONE {
        move_dir.y = 0.0;
    }

    let stopping_x = move_dir.x == 0.0;
    let stopping_y = move_dir.y == 0.0;

    let target = move_dir.scaled(PLAYER_SPEED);
    player.velocity.lerp_toward(target, dt * PLAYER_ACCEL_RATE);

    // Facing follows the right stick; neutral stick releases it.
    player.facing = vector_to_cardinal(controls.right_stick());

    let strike_was_down = player
        .player_info()
        .map_or(false, |info| info.strike_down);
    let mut strike_down = strike_was_down;
    if controls.right_trigger() == 0.0 {
        strike_down = false;
    }

    let mut wind_up = false;
    if !strike_was_down && controls.right_trigger() > 0.0 {
        player.velocity = Vec2::ZERO;
        wind_up = true;
    }

    for (control, direction) in [
        (Control::StrikeUp, Cardinal::North),
        (Control::StrikeDown, Cardinal::South),
        (Control::StrikeLeft, Cardinal::West),
        (Control::StrikeRight, Cardinal::East),
    ] {
        if controls.is_down(control) {
            player.facing = Some(direction);
            wind_up = true;
        }
    }

    if let Some(info) = player.player_info_mut() {
        info.stopping_x = stopping_x;
        info.stopping_y = stopping_y;
        info.strike_down = strike_down;
    }

    if wind_up {
        change_state(player, ctx, Some(&PLAYER_WIND_UP));
    }
}

// --- update ---

fn player_stand_update(player: &mut Actor, ctx: &mut WorldCtx<'_>, _dt: f32) {
    if !player.velocity.is_zero() {
        change_state(player, ctx, Some(&PLAYER_RUN));
    }
}

fn player_walk_update(player: &mut Actor, ctx: &mut WorldCtx<'_>, _dt: f32) {
    let (stopping_x, stopping_y) = player
        .player_info()
        .map_or((true, true), |info| (info.stopping_x, info.stopping_y));

    if stopping_x {
        player.velocity.x = lerp_epsilon(
            player.velocity.x,
            0.0,
            PLAYER_FRICTION,
            PLAYER_FRICTION_EPSILON,
        );
    }
    if stopping_y {
        player.velocity.y = lerp_epsilon(
            player.velocity.y,
            0.0,
            PLAYER_FRICTION,
            PLAYER_FRICTION_EPSILON,
        );
    }

    if player.velocity.is_zero() {
        change_state(player, ctx, Some(&PLAYER_STAND));
    }
}

fn butterfly_update(actor: &mut Actor, ctx: &mut WorldCtx<'_>, _dt: f32) {
    let ActorInfo::Timer(timer) = &mut actor.info else {
        return;
    };

    *timer -= 1;
    if *timer > 0 {
        return;
    }
    *timer = ctx.rng().gen_range(FLUTTER_MIN_TICKS..=FLUTTER_MAX_TICKS);

    if actor.velocity.is_zero() {
        // commence fluttering
        actor.velocity = Vec2::new(FLUTTER_SPEED, 0.0);
    }

    let degrees = ctx.rng().gen_range(0..360) as f32;
    actor.velocity = actor.velocity.rotated(degrees.to_radians());
}

// --- enter/exit ---

/// Exit hook of the strike pose: place the hit volume on the tile the
/// player faces.
fn player_strike(player: &mut Actor, ctx: &mut WorldCtx<'_>) {
    if let Some(info) = player.player_info_mut() {
        info.strike_down = true;
    }

    let facing = player.facing.unwrap_or(player.direction);
    let tile = adjacent_tile(player.position, facing);

    // Actor positions are sprite-bottom, so drop to the tile's lower edge.
    let mut position = tile_center(tile);
    position.y += SCALED_TILE_SIZE as f32 / 2.0;

    ctx.spawn(ActorKind::HandStrike, position);
}

// --- contact ---

fn player_contact(player: &mut Actor, hit: &mut Actor, _ctx: &mut WorldCtx<'_>) {
    if !hit.flags.contains(ActorFlags::COLLECTIBLE) {
        return;
    }
    let Some(item) = hit.item_info() else {
        return;
    };

    let picked_up = player
        .player_info_mut()
        .map_or(false, |info| info.inventory.try_insert(hit.kind, item));

    if picked_up {
        hit.flags.insert(ActorFlags::REMOVE);
    }
}

fn strike_contact(strike: &mut Actor, hit: &mut Actor, ctx: &mut WorldCtx<'_>) {
    damage_actor(strike.damage, hit, ctx);
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::actor::{ActorIdAllocator, Spawner};
    use crate::world::tile::TileGrid;

    fn with_ctx<R>(f: impl FnOnce(&mut WorldCtx<'_>) -> R) -> (R, Vec<Actor>) {
        let mut tiles = TileGrid::new();
        let mut rng = SmallRng::seed_from_u64(99);
        let mut pending = Vec::new();
        let mut allocator = ActorIdAllocator::default();
        let result = {
            let mut ctx = WorldCtx::new(
                &mut tiles,
                &mut rng,
                Spawner::new(&mut pending, &mut allocator),
            );
            f(&mut ctx)
        };
        (result, pending)
    }

    fn player() -> Actor {
        build_actor(ActorId(0), ActorKind::Player, Position::new(240.0, 240.0))
    }

    #[test]
    fn templates_resolve_zero_hitboxes_from_sprites() {
        let log = build_actor(ActorId(0), ActorKind::Log, Position::ZERO);
        let sprite = log.sprite().expect("log sprite");
        assert_eq!(log.hitbox_width, sprite.location.w as u8);
        assert_eq!(log.hitbox_height, sprite.location.h as u8);

        // Explicit hitboxes survive.
        let p = player();
        assert_eq!((p.hitbox_width, p.hitbox_height), (5, 4));
    }

    #[test]
    fn player_template_owns_an_inventory() {
        let p = player();
        let info = p.player_info().expect("player payload");
        assert!(info.inventory.items().is_empty());
    }

    #[test]
    fn movement_input_accelerates_toward_commanded_direction() {
        let mut p = player();
        let controls = ControlSnapshot::empty().with_control_down(Control::MoveRight, true);

        let ((), _) = with_ctx(|ctx| {
            player_handle_input(&mut p, ctx, &controls, 1.0 / 30.0);
        });

        assert!(p.velocity.x > 0.0);
        assert_eq!(p.velocity.y, 0.0);
        let info = p.player_info().expect("payload");
        assert!(!info.stopping_x);
        assert!(info.stopping_y);
    }

    #[test]
    fn stick_deadzone_snaps_small_deflections() {
        let mut p = player();
        let controls =
            ControlSnapshot::empty().with_left_stick(Vec2::new(0.1, 0.19));

        let ((), _) = with_ctx(|ctx| {
            player_handle_input(&mut p, ctx, &controls, 1.0 / 30.0);
        });

        assert_eq!(p.velocity, Vec2::ZERO);
    }

    #[test]
    fn trigger_press_starts_wind_up_once() {
        let mut p = player();
        let pressed = ControlSnapshot::empty().with_right_trigger(1.0);

        let ((), _) = with_ctx(|ctx| {
            player_handle_input(&mut p, ctx, &pressed, 1.0 / 30.0);
            assert!(std::ptr::eq(p.state.expect("state"), &PLAYER_WIND_UP));
            assert_eq!(p.velocity, Vec2::ZERO);

            // Walk the wind-up and strike pose to completion; the strike
            // exit hook latches strike_down.
            for _ in 0..(WIND_UP_TICKS + STRIKE_POSE_TICKS) {
                crate::actor::update_actor(&mut p, ctx, 1.0 / 30.0);
            }
            assert!(std::ptr::eq(p.state.expect("state"), &PLAYER_STAND));
            assert!(p.player_info().expect("payload").strike_down);

            // Still holding the trigger: no second wind-up.
            player_handle_input(&mut p, ctx, &pressed, 1.0 / 30.0);
            assert!(std::ptr::eq(p.state.expect("state"), &PLAYER_STAND));

            // Release, then press again: wind-up re-arms.
            let released = ControlSnapshot::empty();
            player_handle_input(&mut p, ctx, &released, 1.0 / 30.0);
            player_handle_input(&mut p, ctx, &pressed, 1.0 / 30.0);
            assert!(std::ptr::eq(p.state.expect("state"), &PLAYER_WIND_UP));
        });
    }

    #[test]
    fn strike_exit_spawns_hit_volume_on_faced_tile() {
        let mut p = player();
        p.facing = Some(Cardinal::East);

        let ((), pending) = with_ctx(|ctx| {
            player_strike(&mut p, ctx);
        });

        assert_eq!(pending.len(), 1);
        let strike = &pending[0];
        assert_eq!(strike.kind, ActorKind::HandStrike);

        let expected_tile = adjacent_tile(p.position, Cardinal::East);
        let mut expected = tile_center(expected_tile);
        expected.y += SCALED_TILE_SIZE as f32 / 2.0;
        assert_eq!(strike.position, expected);
    }

    #[test]
    fn walk_friction_stops_player_and_returns_to_stand() {
        let mut p = player();
        p.state = Some(&PLAYER_RUN);
        p.velocity = Vec2::new(3.0, 0.0);
        if let Some(info) = p.player_info_mut() {
            info.stopping_x = true;
            info.stopping_y = true;
        }

        let ((), _) = with_ctx(|ctx| {
            for _ in 0..16 {
                player_walk_update(&mut p, ctx, 1.0 / 30.0);
            }
        });

        assert_eq!(p.velocity, Vec2::ZERO);
        assert!(std::ptr::eq(p.state.expect("state"), &PLAYER_STAND));
    }

    #[test]
    fn pickup_moves_collectible_into_inventory() {
        let mut p = player();
        let mut leaves = build_actor(ActorId(1), ActorKind::Leaves, Position::ZERO);

        let ((), _) = with_ctx(|ctx| {
            player_contact(&mut p, &mut leaves, ctx);
        });

        assert!(leaves.is_removed());
        let items = p.player_info().expect("payload").inventory.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ActorKind::Leaves);
    }

    #[test]
    fn pickup_ignores_non_collectibles() {
        let mut p = player();
        let mut tree = build_actor(ActorId(1), ActorKind::Tree, Position::ZERO);

        let ((), _) = with_ctx(|ctx| {
            player_contact(&mut p, &mut tree, ctx);
        });

        assert!(!tree.is_removed());
        assert!(p.player_info().expect("payload").inventory.items().is_empty());
    }

    #[test]
    fn butterfly_flutter_kicks_off_with_speed() {
        let mut butterfly = build_actor(ActorId(2), ActorKind::Butterfly, Position::ZERO);

        let ((), _) = with_ctx(|ctx| {
            // Timer starts at 0, so the first update always retriggers.
            butterfly_update(&mut butterfly, ctx, 1.0 / 30.0);
        });

        let speed = butterfly.velocity.length();
        assert!((speed - FLUTTER_SPEED).abs() < 1e-3);
        match butterfly.info {
            ActorInfo::Timer(t) => assert!((FLUTTER_MIN_TICKS..=FLUTTER_MAX_TICKS).contains(&t)),
            _ => panic!("butterfly payload must stay a timer"),
        }
    }
}
