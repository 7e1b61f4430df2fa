use crate::cardinal::Cardinal;
use crate::coord::{TileCoord, WORLD_HEIGHT, WORLD_WIDTH};
use crate::geometry::Rgb;

/// Elevation bands, lowest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum Terrain {
    #[default]
    DeepWater,
    ShallowWater,
    Grass,
    Forest,
    DarkForest,
}

impl Terrain {
    pub fn is_water(self) -> bool {
        matches!(self, Terrain::DeepWater | Terrain::ShallowWater)
    }
}

/// Upper elevation bound per band; the first bound the value is below
/// wins. Values at or above the last bound stay in the last band.
const TERRAIN_ELEVATIONS: [(f32, Terrain); 5] = [
    (-0.45, Terrain::DeepWater),
    (-0.20, Terrain::ShallowWater),
    (0.05, Terrain::Grass),
    (0.30, Terrain::Forest),
    (f32::INFINITY, Terrain::DarkForest),
];

/// Pure elevation-to-terrain classification; same value in, same band out,
/// regardless of call order or loading history.
pub fn classify_terrain(elevation: f32) -> Terrain {
    for (bound, terrain) in TERRAIN_ELEVATIONS {
        if elevation < bound {
            return terrain;
        }
    }
    Terrain::DarkForest
}

/// Handle to a decorative overlay generated by the render layer. The core
/// only records the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub terrain: Terrain,
    /// Random byte for per-tile visual variation.
    pub variety: u8,
    /// Lerped toward the world ambient light, never snapped.
    pub lighting: Rgb,
    pub effect: Option<EffectHandle>,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            terrain: Terrain::DeepWater,
            variety: 0,
            lighting: Rgb::new(255.0, 255.0, 255.0),
            effect: None,
        }
    }
}

/// The full world tile grid. Out-of-range lookups return `None`; callers
/// treat an absent neighbor as "no terrain constraint".
#[derive(Debug)]
pub struct TileGrid {
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new() -> Self {
        Self {
            tiles: vec![Tile::default(); (WORLD_WIDTH * WORLD_HEIGHT) as usize],
        }
    }

    fn index(coord: TileCoord) -> Option<usize> {
        if coord.x < 0 || coord.x >= WORLD_WIDTH || coord.y < 0 || coord.y >= WORLD_HEIGHT {
            return None;
        }
        Some((coord.y * WORLD_WIDTH + coord.x) as usize)
    }

    pub fn get(&self, coord: TileCoord) -> Option<&Tile> {
        Self::index(coord).map(|index| &self.tiles[index])
    }

    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        Self::index(coord).map(|index| &mut self.tiles[index])
    }

    /// N/S/E/W neighbors, in sprite-row cardinal order.
    pub fn adjacent(&self, coord: TileCoord) -> [Option<&Tile>; 4] {
        [
            Cardinal::North,
            Cardinal::South,
            Cardinal::East,
            Cardinal::West,
        ]
        .map(|direction| {
            let (dx, dy) = direction.offset();
            self.get(TileCoord {
                x: coord.x + dx,
                y: coord.y + dy,
            })
        })
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_covers_every_band() {
        assert_eq!(classify_terrain(-1.0), Terrain::DeepWater);
        assert_eq!(classify_terrain(-0.3), Terrain::ShallowWater);
        assert_eq!(classify_terrain(0.0), Terrain::Grass);
        assert_eq!(classify_terrain(0.1), Terrain::Forest);
        assert_eq!(classify_terrain(0.5), Terrain::DarkForest);
    }

    #[test]
    fn classification_boundaries_round_up() {
        // A value exactly at a bound belongs to the band above it.
        assert_eq!(classify_terrain(-0.45), Terrain::ShallowWater);
        assert_eq!(classify_terrain(-0.20), Terrain::Grass);
        assert_eq!(classify_terrain(0.05), Terrain::Forest);
        assert_eq!(classify_terrain(0.30), Terrain::DarkForest);
    }

    #[test]
    fn classification_is_pure() {
        for elevation in [-0.9f32, -0.33, 0.02, 0.21, 0.77] {
            let first = classify_terrain(elevation);
            for _ in 0..3 {
                assert_eq!(classify_terrain(elevation), first);
            }
        }
    }

    #[test]
    fn out_of_range_lookup_returns_none() {
        let grid = TileGrid::new();
        assert!(grid.get(TileCoord { x: -1, y: 0 }).is_none());
        assert!(grid.get(TileCoord { x: 0, y: -1 }).is_none());
        assert!(grid
            .get(TileCoord {
                x: WORLD_WIDTH,
                y: 0
            })
            .is_none());
        assert!(grid.get(TileCoord { x: 0, y: 0 }).is_some());
    }

    #[test]
    fn adjacency_at_the_border_has_absent_neighbors() {
        let grid = TileGrid::new();
        let corner = grid.adjacent(TileCoord { x: 0, y: 0 });
        assert!(corner[0].is_none()); // north
        assert!(corner[1].is_some()); // south
        assert!(corner[2].is_some()); // east
        assert!(corner[3].is_none()); // west
    }
}
