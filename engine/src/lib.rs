pub mod collision;
pub mod constants;
pub mod entities;
pub mod events;
pub mod grid;
pub mod input;
pub mod rng;
pub mod spawn;
pub mod state;

pub use events::EngineEvent;
pub use input::InputSnapshot;
pub use state::{Engine, GameState};
