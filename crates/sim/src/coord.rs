use crate::cardinal::Cardinal;
use crate::geometry::{Rect2, Vec2};

/// Sprite size in unscaled pixels.
pub const TILE_SIZE: i32 = 16;

/// Everything in the world is drawn at this integer scale.
pub const DRAW_SCALE: i32 = 3;

/// One tile's footprint in world pixels.
pub const SCALED_TILE_SIZE: i32 = TILE_SIZE * DRAW_SCALE;

/// World dimensions in tiles.
pub const WORLD_WIDTH: i32 = 512;
pub const WORLD_HEIGHT: i32 = 512;

/// Chunk edge length in tiles; the unit of lazy generation.
pub const CHUNK_SIZE: i32 = 32;

/// The internal resolution of the game, 16:9.
pub const GAME_WIDTH: i32 = 480 * DRAW_SCALE;
pub const GAME_HEIGHT: i32 = 270 * DRAW_SCALE;

/// Location in world pixels. An actor's position is the bottom center of
/// its visible sprite.
pub type Position = Vec2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

pub fn position_to_tile(position: Position) -> TileCoord {
    TileCoord {
        x: position.x as i32 / SCALED_TILE_SIZE,
        y: position.y as i32 / SCALED_TILE_SIZE,
    }
}

/// The world pixel at a tile's top left corner.
pub fn tile_to_position(tile: TileCoord) -> Position {
    Position {
        x: (tile.x * SCALED_TILE_SIZE) as f32,
        y: (tile.y * SCALED_TILE_SIZE) as f32,
    }
}

pub fn tile_center(tile: TileCoord) -> Position {
    let corner = tile_to_position(tile);
    Position {
        x: corner.x + SCALED_TILE_SIZE as f32 / 2.0,
        y: corner.y + SCALED_TILE_SIZE as f32 / 2.0,
    }
}

pub fn tile_to_chunk(tile: TileCoord) -> ChunkCoord {
    ChunkCoord {
        x: tile.x / CHUNK_SIZE,
        y: tile.y / CHUNK_SIZE,
    }
}

pub fn position_to_chunk(position: Position) -> ChunkCoord {
    tile_to_chunk(position_to_tile(position))
}

/// The tile at a chunk's top left corner.
pub fn chunk_to_tile(chunk: ChunkCoord) -> TileCoord {
    TileCoord {
        x: chunk.x * CHUNK_SIZE,
        y: chunk.y * CHUNK_SIZE,
    }
}

/// The tile adjacent to `position` in `direction`.
pub fn adjacent_tile(position: Position, direction: Cardinal) -> TileCoord {
    let tile = position_to_tile(position);
    let (dx, dy) = direction.offset();
    TileCoord {
        x: tile.x + dx,
        y: tile.y + dy,
    }
}

/// The camera-centered rectangle of world pixels currently on screen.
pub fn visible_rect(camera: Position) -> Rect2 {
    Rect2 {
        x: camera.x - GAME_WIDTH as f32 / 2.0,
        y: camera.y - GAME_HEIGHT as f32 / 2.0,
        w: GAME_WIDTH as f32,
        h: GAME_HEIGHT as f32,
    }
}

/// Inclusive tile-coordinate bounds of the visible rectangle. The +1 on the
/// max corner accounts for screen sizes with a fractional tile count.
pub fn visible_tile_range(camera: Position) -> (TileCoord, TileCoord) {
    let rect = visible_rect(camera);

    let min = TileCoord {
        x: rect.x as i32 / SCALED_TILE_SIZE,
        y: rect.y as i32 / SCALED_TILE_SIZE,
    };
    let max = TileCoord {
        x: min.x + GAME_WIDTH / SCALED_TILE_SIZE + 1,
        y: min.y + GAME_HEIGHT / SCALED_TILE_SIZE + 1,
    };

    (min, max)
}
