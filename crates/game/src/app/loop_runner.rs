use std::time::{Duration, Instant};

use sim::{ControlSnapshot, TickReport, World, FRAME_TIME_SECONDS};
use tracing::{debug, info};

use super::config::RunConfig;
use super::metrics::MetricsAccumulator;

/// Drive the simulation headless for a fixed number of ticks, as fast as
/// the machine allows. No input layer is attached, so the control
/// snapshot stays empty and the world just lives: the day clock runs,
/// butterflies wander, chunks stream in around the idle player.
pub(crate) fn run(config: RunConfig) -> Result<(), String> {
    let started = Instant::now();
    let mut world = World::generate(config.seed)
        .map_err(|error| format!("world generation failed: {error}"))?;
    info!(
        seed = config.seed,
        actors = world.actors().len(),
        setup_ms = started.elapsed().as_millis() as u64,
        "world_ready"
    );

    let controls = ControlSnapshot::empty();
    let mut report = TickReport::default();
    let mut metrics = MetricsAccumulator::new(Duration::from_millis(config.metrics_interval_ms));

    for _ in 0..config.ticks {
        let tick_started = Instant::now();
        world.update(&controls, FRAME_TIME_SECONDS, &mut report);
        metrics.record_tick(tick_started.elapsed());

        if report.chunks_generated > 0 {
            // Inline generation is the one known frame-time spike.
            debug!(chunks = report.chunks_generated, "generation_spike");
        }

        if let Some(snapshot) = metrics.maybe_snapshot(Instant::now()) {
            info!(
                tps = snapshot.tps,
                tick_time_ms = snapshot.tick_time_ms,
                report = %serde_json::to_string(&report).unwrap_or_default(),
                "sim_metrics"
            );
        }
    }

    info!(
        ticks = config.ticks,
        actors = world.actors().len(),
        clock = world.clock(),
        total_ms = started.elapsed().as_millis() as u64,
        "run_complete"
    );
    Ok(())
}
