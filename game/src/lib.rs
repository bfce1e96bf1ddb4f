//! Marble maze: steer a ball through tile mazes by tilting the world.
//!
//! The library is the whole game; `main.rs` is just a headless runner that
//! wires it to an engine context and prints what the HUD would show.

pub mod categories;
pub mod control;
pub mod factory;
pub mod game;
pub mod level;

pub use categories::Category;
pub use control::{ControlSource, DragControl, TiltControl};
pub use factory::EntityFactory;
pub use game::MazeGame;
pub use level::{parse, EntityDescriptor, LevelError, LevelSet};
