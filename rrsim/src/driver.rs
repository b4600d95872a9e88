/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Timer loop that drives a [`Simulation`].
//!
//! Injection and ticking run on **one** tokio task: both timers feed a single
//! `select!`, so an injection can never interleave with a half-applied tick.
//! Stopping is just "stop polling the timers" — there is nothing in flight to
//! unwind.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::simulation::Simulation;

/// Timer settings for [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    pub tick_interval: Duration,
    /// `None` disables automatic injection.
    pub injection_interval: Option<Duration>,
    /// Stop after this many ticks.  `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

/// What a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub injected: u64,
    pub processed: u64,
}

/// Drive `sim` until `shutdown` resolves or `max_ticks` ticks have run.
///
/// The simulation must already be configured.  Timer order within one
/// instant is fixed: shutdown, then injection, then tick.
pub async fn run<F>(sim: &mut Simulation, settings: DriverSettings, shutdown: F) -> Result<RunSummary>
where
    F: Future<Output = ()>,
{
    anyhow::ensure!(
        !settings.tick_interval.is_zero(),
        "tick interval must be non-zero"
    );
    anyhow::ensure!(
        settings.injection_interval != Some(Duration::ZERO),
        "injection interval must be non-zero (use None to disable injection)"
    );

    tokio::pin!(shutdown);

    let mut tick_timer = interval(settings.tick_interval);
    tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // A disabled injector still needs a timer to select on; it is never polled.
    let inject_every = settings.injection_interval.unwrap_or(Duration::from_secs(3600));
    let mut inject_timer = interval(inject_every);
    inject_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut summary = RunSummary::default();

    info!(
        tick_interval_ms = settings.tick_interval.as_millis() as u64,
        injection_interval_ms = settings.injection_interval.map(|d| d.as_millis() as u64),
        max_ticks = settings.max_ticks,
        "driver started"
    );

    loop {
        if settings.max_ticks.is_some_and(|max| summary.ticks >= max) {
            break;
        }

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("shutdown requested");
                break;
            }

            _ = inject_timer.tick(), if settings.injection_interval.is_some() => {
                sim.inject_random()?;
                summary.injected += 1;
            }

            _ = tick_timer.tick() => {
                let batch = sim.tick()?;
                summary.ticks += 1;
                summary.processed += batch.processed.len() as u64;

                let m = sim.metrics();
                debug!(
                    tick        = summary.ticks,
                    served      = batch.processed.len(),
                    queued      = sim.queues().total_len(),
                    total       = m.total_processed,
                    avg_latency = m.average_latency_ms,
                    "tick"
                );
            }
        }
    }

    info!(
        ticks     = summary.ticks,
        injected  = summary.injected,
        processed = summary.processed,
        "driver stopped"
    );
    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientRegistry;
    use crate::injector::Injector;
    use crate::message::ManualClock;
    use crate::scheduler::SimError;
    use crate::simulation::SimSettings;
    use std::sync::Arc;

    fn configured_sim(cores: usize) -> Simulation {
        let mut sim = Simulation::new(
            ClientRegistry::default(),
            SimSettings::default(),
            Arc::new(ManualClock::new(0)),
        )
        .with_injector(Injector::seeded(3));
        sim.configure(cores).unwrap();
        sim
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_max_ticks() {
        let mut sim = configured_sim(2);
        let settings = DriverSettings {
            tick_interval: Duration::from_millis(100),
            injection_interval: Some(Duration::from_millis(30)),
            max_ticks: Some(10),
        };
        let summary = run(&mut sim, settings, std::future::pending()).await.unwrap();

        assert_eq!(summary.ticks, 10);
        assert_eq!(sim.ticks(), 10);
        assert!(summary.injected > 0);
        assert_eq!(summary.injected, sim.total_injected());
        assert_eq!(summary.processed, sim.metrics().total_processed);
        assert_eq!(
            sim.queues().total_len() as u64 + summary.processed,
            summary.injected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_injection_only_ticks() {
        let mut sim = configured_sim(1);
        let settings = DriverSettings {
            tick_interval: Duration::from_millis(10),
            injection_interval: None,
            max_ticks: Some(5),
        };
        let summary = run(&mut sim, settings, std::future::pending()).await.unwrap();
        assert_eq!(
            summary,
            RunSummary {
                ticks: 5,
                injected: 0,
                processed: 0
            }
        );
        assert_eq!(sim.cores()[0].rotation_index, 1, "5 ticks over 4 clients");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_future_stops_the_loop() {
        let mut sim = configured_sim(1);
        let settings = DriverSettings {
            tick_interval: Duration::from_millis(100),
            injection_interval: Some(Duration::from_millis(100)),
            max_ticks: None,
        };
        let shutdown = tokio::time::sleep(Duration::from_millis(450));
        let summary = run(&mut sim, settings, shutdown).await.unwrap();

        // Ticks at 0, 100, 200, 300, 400.
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.injected, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_intervals_are_rejected() {
        let mut sim = configured_sim(1);
        let zero_tick = DriverSettings {
            tick_interval: Duration::ZERO,
            injection_interval: None,
            max_ticks: Some(1),
        };
        assert!(run(&mut sim, zero_tick, std::future::pending()).await.is_err());

        let zero_inject = DriverSettings {
            tick_interval: Duration::from_millis(10),
            injection_interval: Some(Duration::ZERO),
            max_ticks: Some(1),
        };
        assert!(run(&mut sim, zero_inject, std::future::pending()).await.is_err());
        assert_eq!(sim.ticks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unconfigured_simulation_is_an_error() {
        let mut sim = Simulation::default();
        let settings = DriverSettings {
            tick_interval: Duration::from_millis(10),
            injection_interval: None,
            max_ticks: Some(1),
        };
        let err = run(&mut sim, settings, std::future::pending()).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SimError>(),
            Some(&SimError::NotConfigured)
        );
    }
}
