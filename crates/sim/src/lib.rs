//! Simulation core of a top-down, tile-based 2D world: the actor
//! framework, movement and collision resolution, contact dispatch, and the
//! chunked noise-driven world generator/streamer.
//!
//! Rendering, input polling, UI and audio are external collaborators: they
//! feed a [`ControlSnapshot`] in each tick and read actor/tile drawable
//! state back out. The whole simulation is single-threaded and runs one
//! tick to completion per [`World::update`] call.

pub mod actor;
pub mod cardinal;
pub mod controls;
pub mod coord;
pub mod diagnostics;
pub mod geometry;
pub mod inventory;
pub mod sprite;
pub mod world;

pub use actor::{
    Actor, ActorFlags, ActorId, ActorInfo, ActorKind, ActorState, ActorTree, Actors, Damage, Drop,
    Health, ItemInfo, PlayerInfo,
};
pub use cardinal::{vector_to_cardinal, Cardinal};
pub use controls::{Control, ControlSnapshot};
pub use coord::{
    position_to_chunk, position_to_tile, tile_center, visible_rect, visible_tile_range, ChunkCoord,
    Position, TileCoord, CHUNK_SIZE, DRAW_SCALE, SCALED_TILE_SIZE, TILE_SIZE, WORLD_HEIGHT,
    WORLD_WIDTH,
};
pub use diagnostics::TickReport;
pub use geometry::{Rect2, Rgb, Vec2};
pub use sprite::{Sprite, SpriteId};
pub use world::{
    classify_terrain, Terrain, Tile, TileGrid, World, WorldCtx, WorldGenError, DAY_LENGTH_TICKS,
    FRAME_TIME_SECONDS, TICKS_PER_SECOND,
};
