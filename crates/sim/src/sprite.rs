/// Draw ordering bands for the render layer. Lower draws first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DrawOrder {
    Background,
    Foreground,
}

/// Source cell rectangle within a sprite sheet, in unscaled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetRect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

/// Static sprite metadata. The simulation only needs cell sizes (hitbox
/// defaults, visible rects) and frame counts / rates (animation); texture
/// pixels live entirely in the render layer.
///
/// Animation frames or tile variants are laid out horizontally in a sheet;
/// directional rows vertically, in `Cardinal` sprite-row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub sheet: &'static str,
    pub location: SheetRect,
    /// If not animated, the number of variants.
    pub num_frames: u8,
    pub fps: u8,
    pub draw_order: DrawOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    PlayerStand,
    PlayerWalk,
    PlayerSwing,
    PlayerStrike,
    Butterfly,
    Tree,
    Bush,
    LogWorld,
    LogInventory,
    Leaves,
    SticksWorld,
    SticksInventory,
}

impl SpriteId {
    pub fn get(self) -> &'static Sprite {
        &SPRITES[self as usize]
    }
}

const fn cell(x: u16, y: u16, w: u16, h: u16) -> SheetRect {
    SheetRect { x, y, w, h }
}

static SPRITES: [Sprite; 12] = [
    // PlayerStand
    Sprite {
        sheet: "player.png",
        location: cell(0, 0, 16, 16),
        num_frames: 2,
        fps: 2,
        draw_order: DrawOrder::Foreground,
    },
    // PlayerWalk
    Sprite {
        sheet: "player.png",
        location: cell(0, 64, 16, 16),
        num_frames: 4,
        fps: 10,
        draw_order: DrawOrder::Foreground,
    },
    // PlayerSwing
    Sprite {
        sheet: "player.png",
        location: cell(0, 128, 16, 16),
        num_frames: 1,
        fps: 0,
        draw_order: DrawOrder::Foreground,
    },
    // PlayerStrike
    Sprite {
        sheet: "player.png",
        location: cell(16, 128, 16, 16),
        num_frames: 1,
        fps: 0,
        draw_order: DrawOrder::Foreground,
    },
    // Butterfly
    Sprite {
        sheet: "doodads.png",
        location: cell(0, 0, 8, 8),
        num_frames: 2,
        fps: 12,
        draw_order: DrawOrder::Foreground,
    },
    // Tree
    Sprite {
        sheet: "doodads.png",
        location: cell(0, 16, 16, 24),
        num_frames: 3,
        fps: 0,
        draw_order: DrawOrder::Foreground,
    },
    // Bush
    Sprite {
        sheet: "doodads.png",
        location: cell(0, 48, 16, 12),
        num_frames: 3,
        fps: 0,
        draw_order: DrawOrder::Foreground,
    },
    // LogWorld
    Sprite {
        sheet: "items.png",
        location: cell(0, 0, 16, 8),
        num_frames: 1,
        fps: 0,
        draw_order: DrawOrder::Background,
    },
    // LogInventory
    Sprite {
        sheet: "items.png",
        location: cell(0, 8, 32, 32),
        num_frames: 1,
        fps: 0,
        draw_order: DrawOrder::Foreground,
    },
    // Leaves
    Sprite {
        sheet: "items.png",
        location: cell(32, 0, 16, 16),
        num_frames: 1,
        fps: 0,
        draw_order: DrawOrder::Background,
    },
    // SticksWorld
    Sprite {
        sheet: "items.png",
        location: cell(48, 0, 16, 8),
        num_frames: 1,
        fps: 0,
        draw_order: DrawOrder::Background,
    },
    // SticksInventory
    Sprite {
        sheet: "items.png",
        location: cell(48, 8, 16, 32),
        num_frames: 1,
        fps: 0,
        draw_order: DrawOrder::Foreground,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sprite_has_nonzero_cell() {
        for id in [
            SpriteId::PlayerStand,
            SpriteId::PlayerWalk,
            SpriteId::PlayerSwing,
            SpriteId::PlayerStrike,
            SpriteId::Butterfly,
            SpriteId::Tree,
            SpriteId::Bush,
            SpriteId::LogWorld,
            SpriteId::LogInventory,
            SpriteId::Leaves,
            SpriteId::SticksWorld,
            SpriteId::SticksInventory,
        ] {
            let sprite = id.get();
            assert!(sprite.location.w > 0, "{id:?} has zero width");
            assert!(sprite.location.h > 0, "{id:?} has zero height");
            assert!(sprite.num_frames > 0, "{id:?} has zero frames");
        }
    }

    #[test]
    fn animated_sprites_declare_a_rate() {
        assert!(SpriteId::PlayerWalk.get().fps > 0);
        assert!(SpriteId::Butterfly.get().fps > 0);
    }
}
