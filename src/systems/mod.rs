//! The Entity-Component-System (ECS) module.
//!
//! Components, resources and the systems that make up one simulation step.

pub mod collision;
pub mod components;
pub mod ghost;
pub mod item;
pub mod movement;
pub mod player;
pub mod state;

pub use self::collision::*;
pub use self::components::*;
pub use self::ghost::*;
pub use self::item::*;
pub use self::movement::*;
pub use self::player::*;
pub use self::state::*;
