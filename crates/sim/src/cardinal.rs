use crate::geometry::Vec2;

/// The four cardinals come first and in this order because sprite sheets
/// only carry N/S/E/W rows, ordered thusly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinal {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

pub const NUM_SPRITE_DIRECTIONS: usize = 4;

impl Cardinal {
    /// Unit tile offset for this direction. North is negative y.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Cardinal::North => (0, -1),
            Cardinal::South => (0, 1),
            Cardinal::East => (1, 0),
            Cardinal::West => (-1, 0),
            Cardinal::NorthEast => (1, -1),
            Cardinal::NorthWest => (-1, -1),
            Cardinal::SouthEast => (1, 1),
            Cardinal::SouthWest => (-1, 1),
        }
    }

    /// Sprite-sheet row for a directional sprite. Diagonals collapse to
    /// their east/west neighbor since sheets only have four rows.
    pub fn sprite_direction(self) -> Cardinal {
        match self {
            Cardinal::NorthEast | Cardinal::SouthEast => Cardinal::East,
            Cardinal::NorthWest | Cardinal::SouthWest => Cardinal::West,
            other => other,
        }
    }

    /// Row index into a directional sprite sheet.
    pub fn sprite_row(self) -> usize {
        match self.sprite_direction() {
            Cardinal::North => 0,
            Cardinal::South => 1,
            Cardinal::East => 2,
            Cardinal::West => 3,
            _ => unreachable!("sprite_direction returns a cardinal"),
        }
    }
}

/// Classify a velocity vector into one of eight compass directions, or
/// `None` for the zero vector.
///
/// World y grows southward, so the angle is taken with y negated. Ties at
/// exact half-octant boundaries round away from zero.
pub fn vector_to_cardinal(v: Vec2) -> Option<Cardinal> {
    if v.is_zero() {
        return None;
    }

    let degrees = (-v.y).atan2(v.x).to_degrees() + 180.0;
    let octant = (degrees / 45.0).round() as i32;

    match octant {
        0 | 8 => Some(Cardinal::West),
        1 => Some(Cardinal::SouthWest),
        2 => Some(Cardinal::South),
        3 => Some(Cardinal::SouthEast),
        4 => Some(Cardinal::East),
        5 => Some(Cardinal::NorthEast),
        6 => Some(Cardinal::North),
        7 => Some(Cardinal::NorthWest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_vectors_classify_to_cardinals() {
        assert_eq!(vector_to_cardinal(Vec2::new(1.0, 0.0)), Some(Cardinal::East));
        assert_eq!(vector_to_cardinal(Vec2::new(-1.0, 0.0)), Some(Cardinal::West));
        assert_eq!(vector_to_cardinal(Vec2::new(0.0, -1.0)), Some(Cardinal::North));
        assert_eq!(vector_to_cardinal(Vec2::new(0.0, 1.0)), Some(Cardinal::South));
    }

    #[test]
    fn diagonal_vectors_classify_to_intercardinals() {
        assert_eq!(
            vector_to_cardinal(Vec2::new(1.0, -1.0)),
            Some(Cardinal::NorthEast)
        );
        assert_eq!(
            vector_to_cardinal(Vec2::new(-1.0, 1.0)),
            Some(Cardinal::SouthWest)
        );
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert_eq!(vector_to_cardinal(Vec2::ZERO), None);
    }

    #[test]
    fn half_octant_boundary_is_stable() {
        // Exactly 22.5 degrees east of north sits on the NE/N boundary;
        // rounding half away from zero resolves it to north.
        let v = Vec2::new(22.5f32.to_radians().sin(), -(22.5f32.to_radians().cos()));
        assert_eq!(vector_to_cardinal(v), Some(Cardinal::North));
    }

    #[test]
    fn diagonals_collapse_for_sprite_rows() {
        assert_eq!(Cardinal::NorthEast.sprite_direction(), Cardinal::East);
        assert_eq!(Cardinal::SouthEast.sprite_direction(), Cardinal::East);
        assert_eq!(Cardinal::NorthWest.sprite_direction(), Cardinal::West);
        assert_eq!(Cardinal::SouthWest.sprite_direction(), Cardinal::West);
        assert_eq!(Cardinal::North.sprite_direction(), Cardinal::North);
    }

    #[test]
    fn sprite_rows_cover_four_directions() {
        let rows: Vec<usize> = [
            Cardinal::North,
            Cardinal::South,
            Cardinal::East,
            Cardinal::West,
        ]
        .iter()
        .map(|c| c.sprite_row())
        .collect();
        assert_eq!(rows, vec![0, 1, 2, 3]);
        assert!(Cardinal::SouthWest.sprite_row() < NUM_SPRITE_DIRECTIONS);
    }
}
