use crate::state::GameState;

/// Side effects the simulation wants the runtime to perform. The engine
/// queues these during `tick` and the caller drains them afterwards, so
/// the simulation itself never touches a peripheral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineEvent {
    StateChanged { from: GameState, to: GameState },
    BulletFired,
    AsteroidHit { x: f32, y: f32, comet: bool },
    ShipCrashed { x: f32, y: f32 },
    /// Emitted once per beaten record, with the new high score to persist.
    HighScoreBeaten { score: u32 },
}
