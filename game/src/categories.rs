//! Collision categories and the mask table for every entity kind.
//!
//! Each physics body carries three masks: what it *is* (category), what
//! physically blocks it (collision), and what it wants begin-contact
//! notifications for (contact test). The table here is the whole contact
//! policy of the game; everything else dispatches on entity tags.

/// Collision category bits. Each entity kind owns exactly one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Category {
    Player = 1,
    Wall = 2,
    Star = 4,
    Vortex = 8,
    Finish = 16,
}

impl Category {
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// The player wants notifications for everything it can interact with.
pub const PLAYER_CONTACT_MASK: u32 =
    Category::Star.bits() | Category::Vortex.bits() | Category::Finish.bits();

/// Contact-dispatch tags. Walls and the player stay untagged; their
/// interactions are purely physical.
pub const TAG_STAR: &str = "star";
pub const TAG_VORTEX: &str = "vortex";
pub const TAG_FINISH: &str = "finish";
