/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use rrsim::config::SimConfig;
use rrsim::driver::{self, DriverSettings, RunSummary};
use rrsim::injector::Injector;
use rrsim::message::SystemClock;
use rrsim::simulation::Simulation;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Round-robin message scheduler simulation.
///
/// Example:
///   rrsim --config sim.yaml --cores 4 --ticks 20 --snapshot
#[derive(Debug, Parser)]
#[command(
    name = "rrsim",
    about = "Multi-core round-robin message scheduler simulation",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML simulation configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Number of simulated cores (overrides the config file).
    #[arg(short = 'n', long = "cores")]
    cores: Option<usize>,

    /// Scheduler tick interval in milliseconds.
    #[arg(short = 't', long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Automatic injection interval in milliseconds (0 disables injection).
    #[arg(short = 'i', long = "inject-ms")]
    inject_ms: Option<u64>,

    /// Stop after this many ticks (default: run until Ctrl-C).
    #[arg(short = 'k', long = "ticks")]
    ticks: Option<u64>,

    /// Seed for reproducible client / message-kind selection.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Print the final simulation state as YAML on exit.
    #[arg(long = "snapshot", default_value_t = false)]
    snapshot: bool,
}

impl Cli {
    /// Load the config file (or defaults) and apply command-line overrides.
    fn resolve_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load_from_file(path)?,
            None => {
                warn!("No configuration file provided, using default simulation settings");
                SimConfig::default()
            }
        };

        if let Some(cores) = self.cores {
            config.cores = cores;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(inject_ms) = self.inject_ms {
            config.injection_interval_ms = inject_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    info!(
        clients     = ?config.clients,
        cores       = config.cores,
        tick_ms     = config.tick_interval_ms,
        inject_ms   = config.injection_interval_ms,
        max_ticks   = cli.ticks,
        seed        = config.seed,
        "Configuration"
    );

    let mut sim = Simulation::new(config.registry()?, config.settings(), Arc::new(SystemClock))
        .with_injector(Injector::with_seed(config.seed));
    sim.configure(config.cores)
        .context("Failed to configure simulation")?;

    let settings = DriverSettings {
        tick_interval: config.tick_interval(),
        injection_interval: config.injection_interval(),
        max_ticks: cli.ticks,
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C ({e}); stop with --ticks instead");
            std::future::pending::<()>().await;
        }
    };

    let summary = driver::run(&mut sim, settings, shutdown).await?;
    report(&sim, &summary);

    if cli.snapshot {
        let yaml = serde_yaml::to_string(&sim.snapshot()).context("Failed to render snapshot")?;
        println!("{yaml}");
    }
    Ok(())
}

/// Log the end-of-run state, one line per queue and core.
fn report(sim: &Simulation, summary: &RunSummary) {
    let metrics = sim.metrics();
    info!(
        ticks          = summary.ticks,
        injected       = sim.total_injected(),
        processed      = metrics.total_processed,
        avg_latency_ms = metrics.average_latency_ms,
        "Run complete"
    );
    for (client, queue) in sim.queues().iter_in_order(sim.registry()) {
        info!("  [{client}]  pending={}", queue.len());
    }
    for core in sim.cores() {
        let next = sim
            .registry()
            .get(core.rotation_index)
            .map_or("?", |c| c.as_str());
        info!("  core {}  next={}", core.core_id, next);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
