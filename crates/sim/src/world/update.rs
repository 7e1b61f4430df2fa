use super::{
    ambient_light_for_clock, World, WorldCtx, ACTIVE_MARGIN_TILES, CHUNK_STREAM_RADIUS_TILES,
    DAY_LENGTH_TICKS, LIGHT_MARGIN_TILES, TILE_LIGHT_LERP,
};
use crate::actor::{resolve_collisions, update_actor, ActorFlags, ActorId, Axis};
use crate::controls::ControlSnapshot;
use crate::coord::{visible_rect, visible_tile_range, TileCoord, SCALED_TILE_SIZE};
use crate::diagnostics::TickReport;
use crate::geometry::Rect2;

#[cfg(test)]
use crate::actor::Actor;

fn pair_mut<T>(slice: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = slice.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

impl World {
    /// One simulation tick. Runs synchronously to completion, always in
    /// this order: chunk streaming, tile lighting, active-set selection,
    /// input hooks, axis-separated movement, per-actor update, contact
    /// dispatch, the removal sweep, and finally the pending-spawn drain.
    pub fn update(&mut self, controls: &ControlSnapshot, dt: f32, report: &mut TickReport) {
        *report = TickReport::default();

        self.clock += 1;
        if self.clock > DAY_LENGTH_TICKS {
            self.clock = 0;
        }
        self.ambient = ambient_light_for_clock(self.clock);

        // Approaching regions generate inline, on the tick that first
        // needs them. A burst of fresh chunks is a frame-time spike the
        // report makes visible.
        if let Some(position) = self
            .player
            .and_then(|id| self.actors.get(id))
            .map(|actor| actor.position)
        {
            report.chunks_generated =
                self.load_chunks_in_region(position, CHUNK_STREAM_RADIUS_TILES);
        }

        self.update_tiles();
        self.update_actors(controls, dt, report);
        self.update_camera(dt);

        report.clock = self.clock;
        report.actors_live = self.actors.len();
    }

    /// Chase the ambient light on every tile near the screen. The margin
    /// lets light settle before it scrolls into view; the lerp keeps
    /// changes smooth no matter how abruptly the ambient target moves.
    fn update_tiles(&mut self) {
        let (min, max) = visible_tile_range(self.camera);

        for y in (min.y - LIGHT_MARGIN_TILES)..=(max.y + LIGHT_MARGIN_TILES) {
            for x in (min.x - LIGHT_MARGIN_TILES)..=(max.x + LIGHT_MARGIN_TILES) {
                if let Some(tile) = self.tiles.get_mut(TileCoord { x, y }) {
                    tile.lighting.lerp_toward(self.ambient, TILE_LIGHT_LERP);
                }
            }
        }
    }

    fn update_actors(&mut self, controls: &ControlSnapshot, dt: f32, report: &mut TickReport) {
        let World {
            tiles,
            actors,
            camera,
            rng,
            ..
        } = self;

        // The active rect: what the camera sees plus a tile margin on all
        // sides. Actors outside it freeze for the tick.
        let mut active_rect = visible_rect(*camera);
        let margin = (ACTIVE_MARGIN_TILES * SCALED_TILE_SIZE) as f32;
        active_rect.x -= margin;
        active_rect.y -= margin;
        active_rect.w += margin * 2.0;
        active_rect.h += margin * 2.0;

        actors.begin_update();
        let (live, spawner) = actors.split_for_update();
        let mut ctx = WorldCtx::new(tiles, rng, spawner);

        // Select the active set; solid actors double as the blocking set,
        // their hitboxes snapshotted for the whole tick.
        let mut active: Vec<usize> = Vec::new();
        let mut blocks: Vec<(ActorId, Rect2)> = Vec::new();
        for (index, actor) in live.iter().enumerate() {
            if actor.visible_rect().intersects(&active_rect) {
                active.push(index);
                if actor.is_solid() {
                    blocks.push((actor.id, actor.hitbox()));
                }
            }
        }
        report.actors_active = active.len();
        report.blocks = blocks.len();

        // Let any actors that respond to input do so.
        for &index in &active {
            let actor = &mut live[index];
            if let Some(handle_input) = actor.state.and_then(|state| state.handle_input) {
                handle_input(actor, &mut ctx, controls, dt);
            }
        }

        // Integrate movement one axis at a time, resolving against the
        // blocking set after each axis, then run per-actor maintenance.
        // The axes must never be combined into one pass: a single diagonal
        // step cannot tell which side it entered from.
        for &index in &active {
            let actor = &mut live[index];

            if actor.flags.contains(ActorFlags::NON_INTERACTIVE) {
                actor.position = actor.position + actor.velocity.scaled(dt);
            } else {
                if actor.velocity.x != 0.0 {
                    actor.position.x += actor.velocity.x * dt;
                    resolve_collisions(Axis::Horizontal, actor, &blocks);
                }
                if actor.velocity.y != 0.0 {
                    actor.position.y += actor.velocity.y * dt;
                    resolve_collisions(Axis::Vertical, actor, &blocks);
                }
            }

            update_actor(actor, &mut ctx, dt);
        }

        // Contact dispatch: every unordered pair of active, non-removed,
        // non-solid actors with strictly overlapping hitboxes, both
        // directions invoked independently.
        for (slot, &i) in active.iter().enumerate() {
            if live[i].is_removed() || live[i].is_solid() {
                continue;
            }

            for &j in &active[slot + 1..] {
                if live[j].is_removed() || live[j].is_solid() {
                    continue;
                }
                if !live[i].hitbox().intersects(&live[j].hitbox()) {
                    continue;
                }

                report.contacts += 1;
                let (a, b) = pair_mut(live, i, j);
                if let Some(contact) = a.state.and_then(|state| state.contact) {
                    contact(a, b, &mut ctx);
                }
                if let Some(contact) = b.state.and_then(|state| state.contact) {
                    contact(b, a, &mut ctx);
                }
            }
        }

        drop(ctx);

        // Sweep strictly after contact dispatch; drain strictly after the
        // sweep.
        report.removed = actors.sweep();
        report.promoted = actors.end_update();
    }

    /// The camera chases a point slightly ahead of the moving player.
    fn update_camera(&mut self, dt: f32) {
        let Some(player) = self.player.and_then(|id| self.actors.get(id)) else {
            return;
        };

        if !player.velocity.is_zero() {
            self.camera_target = player.position
                + player
                    .velocity
                    .normalized()
                    .scaled(Self::camera_lead_distance());
        }

        self.camera.lerp_toward_epsilon(self.camera_target, dt, 1.0);
    }

    #[cfg(test)]
    pub(crate) fn push_actor_for_test(&mut self, actor: Actor) -> ActorId {
        self.actors.push_live_for_test(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{build_actor, Actor, ActorInfo, ActorKind, ActorState};
    use crate::controls::Control;
    use crate::coord::Position;
    use crate::geometry::{Rgb, Vec2};

    const DT: f32 = 1.0 / 30.0;

    fn tick(world: &mut World) -> TickReport {
        let mut report = TickReport::default();
        world.update(&ControlSnapshot::empty(), DT, &mut report);
        report
    }

    #[test]
    fn descending_mover_rests_exactly_on_solid_top() {
        let mut world = World::empty(0);
        world.spawn(ActorKind::Tree, Position::new(100.0, 100.0));
        let mover = world.spawn(ActorKind::HandStrike, Position::new(100.0, 85.0));
        world
            .actors_mut()
            .get_mut(mover)
            .expect("mover")
            .velocity = Vec2::new(0.0, 50.0);

        let mut report = TickReport::default();
        world.update(&ControlSnapshot::empty(), 0.1, &mut report);

        let tree_top = world
            .actors()
            .find_first_of_kind(ActorKind::Tree)
            .expect("tree")
            .hitbox()
            .y;
        let mover = world.actors().get(mover).expect("mover");

        assert_eq!(mover.velocity.y, 0.0);
        assert_eq!(mover.hitbox().bottom(), tree_top);
        assert!(!mover.hitbox().intersects(
            &world
                .actors()
                .find_first_of_kind(ActorKind::Tree)
                .expect("tree")
                .hitbox()
        ));
    }

    #[test]
    fn diagonal_approach_resolves_one_axis_and_keeps_the_other() {
        let mut world = World::empty(0);
        world.spawn(ActorKind::Tree, Position::new(100.0, 100.0));
        let mover = world.spawn(ActorKind::HandStrike, Position::new(80.0, 80.0));
        world
            .actors_mut()
            .get_mut(mover)
            .expect("mover")
            .velocity = Vec2::new(200.0, 200.0);

        let mut report = TickReport::default();
        world.update(&ControlSnapshot::empty(), 0.1, &mut report);

        let mover = world.actors().get(mover).expect("mover");
        let tree = world
            .actors()
            .find_first_of_kind(ActorKind::Tree)
            .expect("tree");

        // The vertical step hit the tree's top edge; the horizontal
        // component survives untouched.
        assert_eq!(mover.velocity.y, 0.0);
        assert_eq!(mover.velocity.x, 200.0);
        assert_eq!(mover.hitbox().bottom(), tree.hitbox().y);
        assert!(!mover.hitbox().intersects(&tree.hitbox()));
    }

    #[test]
    fn non_interactive_actors_pass_through_solids() {
        let mut world = World::empty(0);
        world.spawn(ActorKind::Tree, Position::new(100.0, 100.0));
        let butterfly = world.spawn(ActorKind::Butterfly, Position::new(100.0, 85.0));
        {
            let actor = world.actors_mut().get_mut(butterfly).expect("butterfly");
            actor.velocity = Vec2::new(0.0, 50.0);
            // Pin the wander timer high so the flutter hook does not
            // redirect the velocity mid-test.
            actor.info = ActorInfo::Timer(1000);
        }

        let mut report = TickReport::default();
        world.update(&ControlSnapshot::empty(), 0.1, &mut report);

        let actor = world.actors().get(butterfly).expect("butterfly");
        assert_eq!(actor.position.y, 90.0);
        assert_eq!(actor.velocity.y, 50.0);
    }

    #[test]
    fn pickup_contact_moves_item_into_inventory_and_sweeps_it() {
        let mut world = World::empty(0);
        let player = world.spawn(ActorKind::Player, Position::new(0.0, 0.0));
        world.spawn(ActorKind::Leaves, Position::new(0.0, 0.0));
        assert_eq!(world.actors().len(), 2);

        let report = tick(&mut world);

        assert_eq!(report.contacts, 1);
        assert_eq!(report.removed, 1);
        assert_eq!(world.actors().len(), 1);
        assert!(world
            .actors()
            .find_first_of_kind(ActorKind::Leaves)
            .is_none());

        let items = world
            .actors()
            .get(player)
            .expect("player")
            .player_info()
            .expect("payload")
            .inventory
            .items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ActorKind::Leaves);
    }

    #[test]
    fn solid_actors_are_excluded_from_contact_dispatch() {
        let mut world = World::empty(0);
        world.spawn(ActorKind::Player, Position::new(100.0, 100.0));
        world.spawn(ActorKind::Tree, Position::new(100.0, 100.0));

        let report = tick(&mut world);
        assert_eq!(report.contacts, 0);
    }

    fn spawning_update(actor: &mut Actor, ctx: &mut WorldCtx<'_>, _dt: f32) {
        // Spawn exactly once, then idle.
        if let ActorInfo::Timer(fired) = &mut actor.info {
            if *fired == 0 {
                *fired = 1;
                ctx.spawn(ActorKind::Butterfly, actor.position);
            }
        }
    }

    static SPAWNING_STATE: ActorState = ActorState {
        update: Some(spawning_update),
        ..ActorState::EMPTY
    };

    #[test]
    fn mid_tick_spawn_waits_in_pending_until_next_tick() {
        let mut world = World::empty(0);
        let mut spawner = build_actor(
            crate::actor::ActorId(0),
            ActorKind::Butterfly,
            Position::new(50.0, 50.0),
        );
        spawner.state = Some(&SPAWNING_STATE);
        spawner.info = ActorInfo::Timer(0);
        world.push_actor_for_test(spawner);

        let report = tick(&mut world);

        // The spawn was requested mid-tick: it was not part of this
        // tick's active set (its flutter timer never ran), but it was
        // promoted at the end of the tick.
        assert_eq!(report.actors_active, 1);
        assert_eq!(report.promoted, 1);
        assert_eq!(world.actors().len(), 2);

        let hatchling = world
            .actors()
            .iter()
            .find(|actor| actor.id != world.actors().iter().next().expect("first").id);
        let hatchling = hatchling.expect("hatchling");
        assert_eq!(hatchling.velocity, Vec2::ZERO);

        // Next tick it simulates: the flutter hook kicks its velocity.
        let report = tick(&mut world);
        assert_eq!(report.actors_active, 2);
        let moving = world
            .actors()
            .iter()
            .filter(|actor| !actor.velocity.is_zero())
            .count();
        assert!(moving >= 1);
    }

    #[test]
    fn actors_outside_the_active_rect_are_frozen() {
        let mut world = World::empty(0);
        let near = world.spawn(ActorKind::Butterfly, Position::new(0.0, 0.0));
        let far = world.spawn(ActorKind::Butterfly, Position::new(20_000.0, 20_000.0));

        tick(&mut world);

        // The near butterfly's flutter hook ran (timer reset, velocity
        // kicked); the far one never simulated.
        assert!(!world.actors().get(near).expect("near").velocity.is_zero());
        assert!(world.actors().get(far).expect("far").velocity.is_zero());
        assert_eq!(world.actors().get(far).expect("far").info, ActorInfo::Timer(0));
    }

    #[test]
    fn tile_lighting_chases_ambient_without_snapping() {
        let mut world = World::empty(0);
        world
            .tiles_mut()
            .get_mut(TileCoord { x: 0, y: 0 })
            .expect("tile")
            .lighting = Rgb::new(0.0, 0.0, 0.0);

        tick(&mut world);

        let lighting = world
            .tiles()
            .get(TileCoord { x: 0, y: 0 })
            .expect("tile")
            .lighting;
        // One lerp step toward daylight, not a snap.
        assert!((lighting.r - 25.5).abs() < 1e-3);
        assert!(lighting.r < 255.0);
    }

    #[test]
    fn day_clock_wraps_at_day_length() {
        let mut world = World::empty(0);
        world.clock = DAY_LENGTH_TICKS;
        let report = tick(&mut world);
        assert_eq!(report.clock, 0);
    }

    #[test]
    fn camera_chases_the_moving_player() {
        let mut world = World::generate(1).expect("world generates");
        let start = world.camera();

        let controls = ControlSnapshot::empty().with_control_down(Control::MoveRight, true);
        let mut report = TickReport::default();
        for _ in 0..10 {
            world.update(&controls, DT, &mut report);
        }

        assert!(world.camera().x > start.x);
    }

    #[test]
    fn kill_by_handle_spawns_drops_before_the_sweep() {
        let mut world = World::empty(0);
        let tree = world.spawn(ActorKind::Tree, Position::new(0.0, 0.0));

        world.kill(tree);

        // No tick in progress: the six drops are live immediately, the
        // tree stays flagged until the next sweep.
        assert_eq!(world.actors().len(), 7);
        assert!(world.actors().get(tree).expect("tree").is_removed());

        let report = tick(&mut world);
        assert_eq!(report.removed, 1);
        assert!(world.actors().get(tree).is_none());
        assert_eq!(world.actors().len(), 6);
    }

    #[test]
    fn strike_volume_expires_on_its_own() {
        let mut world = World::empty(0);
        world.spawn(ActorKind::HandStrike, Position::new(0.0, 0.0));

        let first = tick(&mut world);
        assert_eq!(first.removed, 0);

        let second = tick(&mut world);
        assert_eq!(second.removed, 1);
        assert!(world.actors().is_empty());
    }
}
