/// Debounced input snapshot sampled once per main-loop tick by the input
/// collaborator. `confirm_edge` is a one-shot press edge; the other fields
/// are level state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Heading selected by the encoder, in degrees (0..360).
    pub angle: u16,
    pub confirm_edge: bool,
    pub move_held: bool,
    pub fire_held: bool,
}
