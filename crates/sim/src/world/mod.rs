mod gen;
pub(crate) mod tile;
mod update;

pub use gen::WorldGenError;
pub use tile::{classify_terrain, EffectHandle, Terrain, Tile, TileGrid};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::actor::{Actor, ActorId, ActorKind, Actors, Spawner};
use crate::coord::{Position, TileCoord, CHUNK_SIZE, SCALED_TILE_SIZE, WORLD_HEIGHT, WORLD_WIDTH};
use crate::geometry::Rgb;

use noise::{Fbm, MultiFractal, Perlin};

/// Fixed simulation rate.
pub const TICKS_PER_SECOND: i32 = 30;
pub const FRAME_TIME_SECONDS: f32 = 1.0 / TICKS_PER_SECOND as f32;

/// One in-game day is twenty real minutes.
pub const DAY_LENGTH_TICKS: i32 = 36_000;
pub const HOUR_TICKS: i32 = DAY_LENGTH_TICKS / 24;
const MORNING_START_TICKS: i32 = HOUR_TICKS * 6;
const MORNING_END_TICKS: i32 = HOUR_TICKS * 7;
const DUSK_START_TICKS: i32 = HOUR_TICKS * 20; // 8 PM
const DUSK_END_TICKS: i32 = HOUR_TICKS * 21; // 9 PM

const NIGHT_LIGHT: Rgb = Rgb::new(32.0, 32.0, 96.0);
const DAY_LIGHT: Rgb = Rgb::new(255.0, 255.0, 255.0);

/// Tiles added around the visible rect when selecting the active actor
/// set.
pub const ACTIVE_MARGIN_TILES: i32 = 8;

/// Tiles added around the visible range when lerping tile lighting, so
/// light settles before it scrolls into view.
const LIGHT_MARGIN_TILES: i32 = 4;
const TILE_LIGHT_LERP: f32 = 0.1;

/// Streaming radius around the player, in tiles. Covers the active rect
/// with a chunk to spare.
const CHUNK_STREAM_RADIUS_TILES: i32 = 24;

/// Radius generated up front around the world center before placing the
/// player.
const INITIAL_REGION_RADIUS_TILES: i32 = 32;

/// The player spawns on one of this many grass tiles closest to the world
/// center. Tunable; only "on grass, near the center" is load-bearing.
pub const SPAWN_CANDIDATE_TILES: usize = 256;

const CAMERA_LEAD_TILES: f32 = 3.0;

pub(crate) const CHUNKS_X: i32 = WORLD_WIDTH / CHUNK_SIZE;
pub(crate) const CHUNKS_Y: i32 = WORLD_HEIGHT / CHUNK_SIZE;

/// The world context handed to actor hooks: everything an actor may touch
/// during the actor pass except the live actor collection itself. Spawns
/// requested through it land in the pending buffer.
pub struct WorldCtx<'w> {
    tiles: &'w mut TileGrid,
    rng: &'w mut SmallRng,
    spawner: Spawner<'w>,
}

impl<'w> WorldCtx<'w> {
    pub(crate) fn new(
        tiles: &'w mut TileGrid,
        rng: &'w mut SmallRng,
        spawner: Spawner<'w>,
    ) -> Self {
        Self {
            tiles,
            rng,
            spawner,
        }
    }

    pub fn spawn(&mut self, kind: ActorKind, position: Position) -> ActorId {
        self.spawner.spawn(kind, position)
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(coord)
    }

    pub fn rng(&mut self) -> &mut SmallRng {
        self.rng
    }
}

/// The whole simulated world: tile grid, actor collections, camera and
/// day clock. All mutation happens from the single simulation thread; the
/// tick ordering invariants in `update` stand in for locking.
pub struct World {
    pub(crate) tiles: TileGrid,
    pub(crate) actors: Actors,

    /// The world pixel coordinate centered on screen, and where it is
    /// headed.
    pub(crate) camera: Position,
    pub(crate) camera_target: Position,

    pub(crate) clock: i32,
    /// Ambient color mod applied to tiles; tiles chase it, actors copy
    /// their tile.
    pub(crate) ambient: Rgb,

    pub(crate) rng: SmallRng,
    pub(crate) terrain_noise: Fbm<Perlin>,

    /// One flag per chunk coordinate; a chunk generates at most once.
    pub(crate) loaded_chunks: Vec<bool>,
    /// Tiles claimed by a solid spawn during generation.
    pub(crate) occupied: Vec<bool>,

    pub(crate) player: Option<ActorId>,
}

impl World {
    /// A blank ocean world with nothing generated and no player. Chunks
    /// load lazily as they are approached.
    pub fn empty(seed: u64) -> Self {
        Self {
            tiles: TileGrid::new(),
            actors: Actors::default(),
            camera: Position::ZERO,
            camera_target: Position::ZERO,
            clock: MORNING_END_TICKS,
            ambient: DAY_LIGHT,
            rng: SmallRng::seed_from_u64(seed),
            terrain_noise: Fbm::<Perlin>::new(seed as u32)
                .set_octaves(6)
                .set_frequency(0.01)
                .set_persistence(0.5)
                .set_lacunarity(2.0),
            loaded_chunks: vec![false; (CHUNKS_X * CHUNKS_Y) as usize],
            occupied: vec![false; (WORLD_WIDTH * WORLD_HEIGHT) as usize],
            player: None,
        }
    }

    /// Create a world: generate the central region, then place the player
    /// on a grass tile near the world center.
    pub fn generate(seed: u64) -> Result<Self, WorldGenError> {
        let mut world = Self::empty(seed);

        let center = crate::coord::tile_center(TileCoord {
            x: WORLD_WIDTH / 2,
            y: WORLD_HEIGHT / 2,
        });

        // Generate outward from the center until the placement search has
        // enough grass to work with; reject the seed only once the whole
        // world is loaded.
        let mut radius = INITIAL_REGION_RADIUS_TILES;
        loop {
            world.load_chunks_in_region(center, radius);
            match world.place_player() {
                Ok(()) => break,
                Err(error) if radius < WORLD_HEIGHT / 2 => {
                    warn!(%error, radius, "spawn_search_expanding");
                    radius *= 2;
                }
                Err(error) => return Err(error),
            }
        }

        info!(
            seed,
            num_actors = world.actors.len(),
            "world_generated"
        );

        Ok(world)
    }

    pub fn actors(&self) -> &Actors {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut Actors {
        &mut self.actors
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut TileGrid {
        &mut self.tiles
    }

    pub fn player(&self) -> Option<ActorId> {
        self.player
    }

    /// The player actor, located by kind; the singleton access UI layers
    /// use to reach the inventory payload.
    pub fn player_actor(&self) -> Option<&Actor> {
        self.actors.find_first_of_kind(ActorKind::Player)
    }

    pub fn player_actor_mut(&mut self) -> Option<&mut Actor> {
        self.actors.find_first_of_kind_mut(ActorKind::Player)
    }

    pub fn camera(&self) -> Position {
        self.camera
    }

    pub fn set_camera(&mut self, position: Position) {
        self.camera = position;
        self.camera_target = position;
    }

    pub fn clock(&self) -> i32 {
        self.clock
    }

    pub fn ambient_light(&self) -> Rgb {
        self.ambient
    }

    /// Actors whose visible bounds intersect the camera rect, in no
    /// particular order; the render layer sorts by draw order and y.
    pub fn visible_actors(&self) -> impl Iterator<Item = &Actor> {
        let rect = crate::coord::visible_rect(self.camera);
        self.actors
            .iter()
            .filter(move |actor| actor.visible_rect().intersects(&rect))
    }

    /// Spawn an actor of `kind`. Outside a tick it is live immediately;
    /// during one it joins the pending buffer until the end-of-tick drain.
    pub fn spawn(&mut self, kind: ActorKind, position: Position) -> ActorId {
        self.actors.spawn(kind, position)
    }

    /// Kill an actor by handle: flags it for the next sweep and spawns its
    /// drop table.
    pub fn kill(&mut self, id: ActorId) {
        let World {
            tiles,
            actors,
            rng,
            ..
        } = self;

        let was_updating = actors.is_updating();
        let (live, spawner) = actors.split_for_update();
        let Some(actor) = live.iter_mut().find(|actor| actor.id == id) else {
            return;
        };

        let mut ctx = WorldCtx::new(tiles, rng, spawner);
        crate::actor::kill_actor(actor, &mut ctx);

        if !was_updating {
            self.actors.drain_pending();
        }
    }

    pub(crate) fn camera_lead_distance() -> f32 {
        CAMERA_LEAD_TILES * SCALED_TILE_SIZE as f32
    }
}

/// Ambient light for a day-clock value: piecewise linear across night,
/// dawn ramp, day, and dusk ramp.
pub fn ambient_light_for_clock(clock: i32) -> Rgb {
    use crate::geometry::remap;

    let t = clock as f32;

    if clock < MORNING_START_TICKS || clock >= DUSK_END_TICKS {
        NIGHT_LIGHT
    } else if clock < MORNING_END_TICKS {
        let from = MORNING_START_TICKS as f32;
        let to = (MORNING_END_TICKS - 1) as f32;
        Rgb::new(
            remap(t, from, to, NIGHT_LIGHT.r, DAY_LIGHT.r),
            remap(t, from, to, NIGHT_LIGHT.g, DAY_LIGHT.g),
            remap(t, from, to, NIGHT_LIGHT.b, DAY_LIGHT.b),
        )
    } else if clock >= DUSK_START_TICKS {
        let from = DUSK_START_TICKS as f32;
        let to = (DUSK_END_TICKS - 1) as f32;
        Rgb::new(
            remap(t, from, to, DAY_LIGHT.r, NIGHT_LIGHT.r),
            remap(t, from, to, DAY_LIGHT.g, NIGHT_LIGHT.g),
            remap(t, from, to, DAY_LIGHT.b, NIGHT_LIGHT.b),
        )
    } else {
        DAY_LIGHT
    }
}
