use noise::NoiseFn;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use super::{World, CHUNKS_X, CHUNKS_Y, SPAWN_CANDIDATE_TILES};
use crate::actor::ActorKind;
use crate::coord::{
    chunk_to_tile, position_to_tile, tile_center, ChunkCoord, Position, TileCoord, CHUNK_SIZE,
    SCALED_TILE_SIZE, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::geometry::remap;
use crate::world::tile::{classify_terrain, Terrain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldGenError {
    #[error("not enough grass tiles to place the player: found {found}, need {required}")]
    NotEnoughSpawnTiles { found: usize, required: usize },
}

/// Per-tile spawn odds during generation.
const BUTTERFLY_CHANCE: f64 = 1.0 / 80.0;
const GRASS_TREE_CHANCE: f64 = 1.0 / 100.0;
const BUSH_CHANCE: f64 = 1.0 / 50.0;
const FOREST_TREE_CHANCE: f64 = 1.0 / 3.0;

impl World {
    /// Elevation sample for a tile: multi-octave noise minus a radial
    /// gradient, so land biases toward the world center. Outside the
    /// circular mask, land is removed entirely.
    pub(crate) fn elevation_at(&self, tile: TileCoord) -> f32 {
        let half_width = WORLD_WIDTH as f32 / 2.0;
        let half_height = WORLD_HEIGHT as f32 / 2.0;

        let dx = tile.x as f32 - half_width;
        let dy = tile.y as f32 - half_height;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance >= half_height {
            return -1.0;
        }

        let gradient = remap(distance, 0.0, half_height, 0.0, 1.0);
        let noise = self.terrain_noise.get([tile.x as f64, tile.y as f64]) as f32;
        noise - gradient
    }

    fn generate_terrain_in_chunk(&mut self, chunk: ChunkCoord) {
        let corner = chunk_to_tile(chunk);

        for y in corner.y..corner.y + CHUNK_SIZE {
            for x in corner.x..corner.x + CHUNK_SIZE {
                let coord = TileCoord { x, y };
                let elevation = self.elevation_at(coord);
                let variety = self.rng.gen::<u8>();

                if let Some(tile) = self.tiles.get_mut(coord) {
                    tile.terrain = classify_terrain(elevation);
                    tile.variety = variety;
                    tile.effect = None;
                }
            }
        }
    }

    fn occupied_index(coord: TileCoord) -> Option<usize> {
        if coord.x < 0 || coord.x >= WORLD_WIDTH || coord.y < 0 || coord.y >= WORLD_HEIGHT {
            return None;
        }
        Some((coord.y * WORLD_WIDTH + coord.x) as usize)
    }

    fn is_occupied(&self, coord: TileCoord) -> bool {
        Self::occupied_index(coord).is_some_and(|index| self.occupied[index])
    }

    fn mark_occupied(&mut self, coord: TileCoord) {
        if let Some(index) = Self::occupied_index(coord) {
            self.occupied[index] = true;
        }
    }

    /// Seed a freshly generated chunk with decorations and critters.
    /// Solid spawns claim their tile so later generations cannot stack
    /// another solid on top.
    fn spawn_actors_in_chunk(&mut self, chunk: ChunkCoord) {
        let corner = chunk_to_tile(chunk);
        let jitter = SCALED_TILE_SIZE as f32 / 3.0;

        for y in corner.y..corner.y + CHUNK_SIZE {
            for x in corner.x..corner.x + CHUNK_SIZE {
                let coord = TileCoord { x, y };
                if self.is_occupied(coord) {
                    continue;
                }

                let Some(terrain) = self.tiles.get(coord).map(|tile| tile.terrain) else {
                    continue;
                };

                let mut point = tile_center(coord);
                point.x += self.rng.gen_range(-jitter..jitter);
                point.y += self.rng.gen_range(-jitter..jitter);

                match terrain {
                    Terrain::Grass => {
                        if self.rng.gen_bool(BUTTERFLY_CHANCE) {
                            let id = self.actors.spawn(ActorKind::Butterfly, point);
                            if let Some(butterfly) = self.actors.get_mut(id) {
                                butterfly.z = self.rng.gen_range(12..=16);
                            }
                            continue;
                        }

                        if self.rng.gen_bool(GRASS_TREE_CHANCE) {
                            self.actors.spawn(ActorKind::Tree, point);
                            self.mark_occupied(coord);
                            continue;
                        }

                        if self.rng.gen_bool(BUSH_CHANCE) {
                            self.actors.spawn(ActorKind::Bush, point);
                            self.mark_occupied(coord);
                        }
                    }
                    Terrain::Forest => {
                        if self.rng.gen_bool(FOREST_TREE_CHANCE) {
                            self.actors.spawn(ActorKind::Tree, point);
                            self.mark_occupied(coord);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Generate a chunk if it never was. Returns whether generation
    /// actually ran.
    pub(crate) fn load_chunk_if_needed(&mut self, chunk: ChunkCoord) -> bool {
        if chunk.x < 0 || chunk.x >= CHUNKS_X || chunk.y < 0 || chunk.y >= CHUNKS_Y {
            return false;
        }

        let index = (chunk.y * CHUNKS_X + chunk.x) as usize;
        if self.loaded_chunks[index] {
            return false;
        }

        self.generate_terrain_in_chunk(chunk);
        self.spawn_actors_in_chunk(chunk);
        self.loaded_chunks[index] = true;

        debug!(chunk_x = chunk.x, chunk_y = chunk.y, "chunk_loaded");
        true
    }

    /// Load every not-yet-loaded chunk whose tiles fall within
    /// `tile_radius` of `center`. Invoked every tick at the player, which
    /// is what makes the world stream in. Returns the number of chunks
    /// generated, normally zero.
    pub fn load_chunks_in_region(&mut self, center: Position, tile_radius: i32) -> usize {
        let center_tile = position_to_tile(center);

        let min_chunk = crate::coord::tile_to_chunk(TileCoord {
            x: center_tile.x - tile_radius,
            y: center_tile.y - tile_radius,
        });
        let max_chunk = crate::coord::tile_to_chunk(TileCoord {
            x: center_tile.x + tile_radius,
            y: center_tile.y + tile_radius,
        });

        let mut loaded = 0;
        for y in min_chunk.y..=max_chunk.y {
            for x in min_chunk.x..=max_chunk.x {
                if self.load_chunk_if_needed(ChunkCoord { x, y }) {
                    loaded += 1;
                }
            }
        }
        loaded
    }

    /// Place the player on one of the grass tiles closest to the world
    /// center, chosen uniformly so repeated generations do not share a
    /// spawn point.
    pub(crate) fn place_player(&mut self) -> Result<(), WorldGenError> {
        let center_x = WORLD_WIDTH / 2;
        let center_y = WORLD_HEIGHT / 2;

        let mut candidates: Vec<(i64, TileCoord)> = Vec::new();
        for y in 0..WORLD_HEIGHT {
            for x in 0..WORLD_WIDTH {
                let coord = TileCoord { x, y };
                if self.tiles.get(coord).map(|tile| tile.terrain) != Some(Terrain::Grass) {
                    continue;
                }
                let dx = (x - center_x) as i64;
                let dy = (y - center_y) as i64;
                candidates.push((dx * dx + dy * dy, coord));
            }
        }

        if candidates.len() < SPAWN_CANDIDATE_TILES {
            return Err(WorldGenError::NotEnoughSpawnTiles {
                found: candidates.len(),
                required: SPAWN_CANDIDATE_TILES,
            });
        }

        candidates.sort_by_key(|&(distance_sq, _)| distance_sq);

        let pick = self.rng.gen_range(0..SPAWN_CANDIDATE_TILES);
        let (_, coord) = candidates[pick];
        self.mark_occupied(coord);

        let position = tile_center(coord);
        let player = self.actors.spawn(ActorKind::Player, position);
        self.player = Some(player);
        self.camera = position;
        self.camera_target = position;

        info!(
            tile_x = coord.x,
            tile_y = coord.y,
            "player_placed"
        );
        Ok(())
    }
}
