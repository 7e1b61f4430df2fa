use serde::Serialize;

/// Per-tick telemetry filled in by `World::update`. Owned by whoever runs
/// the loop and passed in by reference, so its lifecycle is scoped to one
/// session rather than living in globals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TickReport {
    pub clock: i32,
    /// Live actors after the sweep and drain.
    pub actors_live: usize,
    /// Actors selected into this tick's active set.
    pub actors_active: usize,
    /// Solid actors in the blocking set.
    pub blocks: usize,
    /// Contact hook pair invocations this tick.
    pub contacts: usize,
    /// Pending spawns promoted at the end of the tick.
    pub promoted: usize,
    /// Actors removed by the sweep.
    pub removed: usize,
    /// Chunks generated this tick; nonzero means a frame-time spike was
    /// spent on inline generation.
    pub chunks_generated: usize,
}
