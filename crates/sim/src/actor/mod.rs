mod defs;
mod state;
mod store;
mod tree;

pub use state::{
    change_state, damage_actor, kill_actor, update_actor, ActorState, ContactFn, EnterExitFn,
    InputFn, UpdateFn,
};
pub use store::{ActorIdAllocator, Actors, Spawner};
pub use tree::{ActorTree, TREE_MAX_DEPTH, TREE_NODE_CAPACITY};

pub(crate) use defs::build_actor;

use crate::cardinal::Cardinal;
use crate::coord::{Position, DRAW_SCALE};
use crate::geometry::{Rect2, Rgb, Vec2};
use crate::inventory::Inventory;
use crate::sprite::{Sprite, SpriteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Player,
    HandStrike,
    Tree,
    Bush,
    Butterfly,
    // items
    Log,
    Leaves,
    Sticks,
}

impl ActorKind {
    pub fn name(self) -> &'static str {
        match self {
            ActorKind::Player => "player",
            ActorKind::HandStrike => "hand_strike",
            ActorKind::Tree => "tree",
            ActorKind::Bush => "bush",
            ActorKind::Butterfly => "butterfly",
            ActorKind::Log => "log",
            ActorKind::Leaves => "leaves",
            ActorKind::Sticks => "sticks",
        }
    }
}

/// Stable actor handle. Valid for lookups until the actor is swept;
/// lookups after that simply return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorFlags(u16);

impl ActorFlags {
    pub const NONE: ActorFlags = ActorFlags(0);
    /// Remove this actor at the end-of-tick sweep.
    pub const REMOVE: ActorFlags = ActorFlags(0x0001);
    /// Movement-blocking obstacle; blocks in the resolver, never contacts.
    pub const SOLID: ActorFlags = ActorFlags(0x0002);
    pub const CAN_BE_DAMAGED: ActorFlags = ActorFlags(0x0004);
    /// Sprite-sheet row selected by the actor's direction.
    pub const DIRECTIONAL: ActorFlags = ActorFlags(0x0008);
    /// Sheet column follows `current_frame`; otherwise the tile variety.
    pub const ANIMATED: ActorFlags = ActorFlags(0x0010);
    /// Ignore tile walkability.
    pub const FLY: ActorFlags = ActorFlags(0x0020);
    /// Skip collision checking entirely.
    pub const NON_INTERACTIVE: ActorFlags = ActorFlags(0x0040);
    /// The player can pick it up.
    pub const COLLECTIBLE: ActorFlags = ActorFlags(0x0080);
    /// Spawns its drop table on death.
    pub const DROPS_ITEMS: ActorFlags = ActorFlags(0x0100);
    pub const CASTS_SHADOW: ActorFlags = ActorFlags(0x0200);

    pub fn contains(self, other: ActorFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ActorFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: ActorFlags) {
        self.0 &= !other.0;
    }
}

impl std::ops::BitOr for ActorFlags {
    type Output = ActorFlags;

    fn bitor(self, rhs: ActorFlags) -> ActorFlags {
        ActorFlags(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Health {
    pub amount: i32,
    /// Damage below this level does not affect health at all.
    pub minimum_damage_level: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Damage {
    /// Damage "rating"; bare hands are 0 (weak).
    pub level: u8,
    pub amount: u8,
}

/// Size and icon of an actor kind as it sits in an inventory grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemInfo {
    /// Size in inventory cells.
    pub width: u8,
    pub height: u8,
    /// If true, width and height are swapped.
    pub sideways: bool,
    pub sprite: SpriteId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drop {
    pub quantity: u8,
    pub kind: ActorKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerInfo {
    pub inventory: Inventory,
    /// No movement input on this axis; friction applies.
    pub stopping_x: bool,
    pub stopping_y: bool,
    pub strike_down: bool,
}

/// Per-kind payload. The tag always matches the actor kind that spawned
/// it, so variant fields are only reachable where they are meaningful.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ActorInfo {
    #[default]
    None,
    /// Free-running countdown used by wandering actors.
    Timer(i32),
    Player(Box<PlayerInfo>),
    Item(ItemInfo),
    Drops(&'static [Drop]),
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub flags: ActorFlags,

    /// World pixels; the bottom center of the visible sprite.
    pub position: Position,
    pub velocity: Vec2,
    /// Ground-relative height. Only affects where the sprite is drawn.
    pub z: i32,

    /// Derived from movement each tick.
    pub direction: Cardinal,
    /// Commanded facing; overrides `direction` when present.
    pub facing: Option<Cardinal>,

    pub health: Health,
    pub damage: Damage,

    /// Used when this actor kind has no state.
    pub sprite: Option<SpriteId>,
    pub current_frame: f32,

    /// Copied from the tile under the actor's feet.
    pub lighting: Rgb,

    /// Hitbox size in unscaled pixels; 0 at definition time means "use
    /// the sprite size", resolved once at spawn.
    pub hitbox_width: u8,
    pub hitbox_height: u8,

    pub state: Option<&'static ActorState>,
    /// Counts down to the state's auto-transition; unused at duration 0.
    pub state_timer: i32,

    pub info: ActorInfo,
}

impl Actor {
    /// The sprite this actor draws with: the state sprite when a state is
    /// present, the template sprite otherwise.
    pub fn sprite_id(&self) -> Option<SpriteId> {
        match self.state {
            Some(state) => state.sprite,
            None => self.sprite,
        }
    }

    pub fn sprite(&self) -> Option<&'static Sprite> {
        self.sprite_id().map(SpriteId::get)
    }

    pub fn is_solid(&self) -> bool {
        self.flags.contains(ActorFlags::SOLID)
    }

    pub fn is_removed(&self) -> bool {
        self.flags.contains(ActorFlags::REMOVE)
    }

    /// Visible rect in world pixel space; zero-sized for sprite-less
    /// actors.
    pub fn visible_rect(&self) -> Rect2 {
        let (w, h) = match self.sprite() {
            Some(sprite) => (
                (sprite.location.w as i32 * DRAW_SCALE) as f32,
                ((sprite.location.h as i32 + self.z) * DRAW_SCALE) as f32,
            ),
            None => (0.0, 0.0),
        };

        Rect2 {
            x: self.position.x - w / 2.0,
            y: self.position.y - h,
            w,
            h,
        }
    }

    /// Hitbox in world pixel space: centered on the actor's x position,
    /// bottom edge aligned with its y position.
    pub fn hitbox(&self) -> Rect2 {
        let w = (self.hitbox_width as i32 * DRAW_SCALE) as f32;
        let h = (self.hitbox_height as i32 * DRAW_SCALE) as f32;

        Rect2 {
            x: self.position.x - w / 2.0,
            y: self.position.y - h,
            w,
            h,
        }
    }

    pub(crate) fn set_position_from_hitbox(&mut self, hitbox: Rect2) {
        self.position = Position {
            x: hitbox.x + hitbox.w / 2.0,
            y: hitbox.y + hitbox.h,
        };
    }

    pub fn player_info(&self) -> Option<&PlayerInfo> {
        match &self.info {
            ActorInfo::Player(info) => Some(info),
            _ => None,
        }
    }

    pub fn player_info_mut(&mut self) -> Option<&mut PlayerInfo> {
        match &mut self.info {
            ActorInfo::Player(info) => Some(info),
            _ => None,
        }
    }

    pub fn item_info(&self) -> Option<ItemInfo> {
        match self.info {
            ActorInfo::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn drops(&self) -> Option<&'static [Drop]> {
        match self.info {
            ActorInfo::Drops(drops) => Some(drops),
            _ => None,
        }
    }
}

/// One axis of the two-pass movement resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Clip `actor` out of every intersecting block along one axis, pushing it
/// to the side its velocity came from and zeroing that velocity component.
/// Blocks are (owner, hitbox) pairs snapshotted for the tick; the actor's
/// own entry is skipped so a moving solid never resolves against itself.
pub fn resolve_collisions(axis: Axis, actor: &mut Actor, blocks: &[(ActorId, Rect2)]) {
    for &(block_id, block_box) in blocks {
        if block_id == actor.id {
            continue;
        }

        let actor_box = actor.hitbox();
        if !actor_box.intersects(&block_box) {
            continue;
        }

        let mut clipped = actor_box;
        match axis {
            Axis::Horizontal => {
                if actor.velocity.x > 0.0 {
                    // clip to the block's left side
                    clipped.x = block_box.x - clipped.w;
                } else if actor.velocity.x < 0.0 {
                    clipped.x = block_box.right();
                }
                actor.set_position_from_hitbox(clipped);
                actor.velocity.x = 0.0;
            }
            Axis::Vertical => {
                if actor.velocity.y > 0.0 {
                    // clip to the block's top side
                    clipped.y = block_box.y - clipped.h;
                } else if actor.velocity.y < 0.0 {
                    clipped.y = block_box.bottom();
                }
                actor.set_position_from_hitbox(clipped);
                actor.velocity.y = 0.0;
            }
        }
    }
}
