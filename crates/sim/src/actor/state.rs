use super::{Actor, ActorFlags, Damage};
use crate::cardinal::vector_to_cardinal;
use crate::controls::ControlSnapshot;
use crate::coord::position_to_tile;
use crate::sprite::SpriteId;
use crate::world::WorldCtx;

pub type InputFn = fn(&mut Actor, &mut WorldCtx<'_>, &ControlSnapshot, f32);
pub type UpdateFn = fn(&mut Actor, &mut WorldCtx<'_>, f32);
pub type ContactFn = fn(&mut Actor, &mut Actor, &mut WorldCtx<'_>);
pub type EnterExitFn = fn(&mut Actor, &mut WorldCtx<'_>);

/// An immutable, shared behavior descriptor. Many actors may reference the
/// same instance; per-actor data stays on the actor.
///
/// Every hook is optional; absence is the normal no-op case. A nonzero
/// `duration_ticks` makes the state timed; a timed state with no
/// `next_state` kills the actor when the timer runs out.
#[derive(Debug)]
pub struct ActorState {
    pub duration_ticks: i32,
    pub next_state: Option<&'static ActorState>,
    pub sprite: Option<SpriteId>,

    pub handle_input: Option<InputFn>,
    pub update: Option<UpdateFn>,
    pub contact: Option<ContactFn>,
    pub on_enter: Option<EnterExitFn>,
    pub on_exit: Option<EnterExitFn>,
}

impl ActorState {
    pub const EMPTY: ActorState = ActorState {
        duration_ticks: 0,
        next_state: None,
        sprite: None,
        handle_input: None,
        update: None,
        contact: None,
        on_enter: None,
        on_exit: None,
    };
}

/// Flag the actor for the end-of-tick sweep, spawning its drop table (one
/// actor per quantity) at its position first.
pub fn kill_actor(actor: &mut Actor, ctx: &mut WorldCtx<'_>) {
    actor.flags.insert(ActorFlags::REMOVE);

    if actor.flags.contains(ActorFlags::DROPS_ITEMS) {
        if let Some(drops) = actor.drops() {
            for drop in drops {
                for _ in 0..drop.quantity {
                    ctx.spawn(drop.kind, actor.position);
                }
            }
        }
    }
}

/// Apply `damage` to `target` if the target can be damaged at all and the
/// damage level clears the target's minimum. Death cascades into
/// drop spawning via `kill_actor`.
pub fn damage_actor(damage: Damage, target: &mut Actor, ctx: &mut WorldCtx<'_>) {
    if !target.flags.contains(ActorFlags::CAN_BE_DAMAGED) {
        return;
    }

    if damage.level >= target.health.minimum_damage_level {
        target.health.amount -= damage.amount as i32;
        if target.health.amount <= 0 {
            kill_actor(target, ctx);
        }
    }
}

/// Switch `actor` to `new_state`, or kill it when `new_state` is absent.
/// The outgoing state's exit hook always runs before the incoming state's
/// enter hook, and the timer is reset to the new state's duration.
pub fn change_state(
    actor: &mut Actor,
    ctx: &mut WorldCtx<'_>,
    new_state: Option<&'static ActorState>,
) {
    if let Some(on_exit) = actor.state.and_then(|state| state.on_exit) {
        on_exit(actor, ctx);
    }

    let Some(new_state) = new_state else {
        kill_actor(actor, ctx);
        return;
    };

    actor.state = Some(new_state);

    if let Some(on_enter) = new_state.on_enter {
        on_enter(actor, ctx);
    }

    actor.state_timer = new_state.duration_ticks;
}

/// Per-tick actor maintenance: facing, animation, lighting, and the state
/// machine (timed transition first, then the current state's update hook).
pub fn update_actor(actor: &mut Actor, ctx: &mut WorldCtx<'_>, dt: f32) {
    match actor.facing {
        Some(facing) => actor.direction = facing,
        None => {
            // Derive facing from movement.
            if let Some(direction) = vector_to_cardinal(actor.velocity) {
                actor.direction = direction;
            }
        }
    }

    if let Some(sprite) = actor.sprite() {
        if actor.flags.contains(ActorFlags::ANIMATED) {
            actor.current_frame += sprite.fps as f32 * dt;
            while actor.current_frame >= sprite.num_frames as f32 {
                actor.current_frame -= sprite.num_frames as f32;
            }
        }

        // Actors take their lighting from the tile under their feet. An
        // absent tile leaves the previous tint in place.
        if let Some(tile) = ctx.tile(position_to_tile(actor.position)) {
            actor.lighting = tile.lighting;
        }
    }

    if let Some(state) = actor.state {
        if state.duration_ticks != 0 {
            actor.state_timer -= 1;
            if actor.state_timer <= 0 {
                change_state(actor, ctx, state.next_state);
            }
        }

        // Re-read: the transition above may have installed a new state.
        if let Some(update) = actor.state.and_then(|state| state.update) {
            update(actor, ctx, dt);
        }
    }
}
