//! Simulation configuration loading.
//!
//! The expected YAML structure is:
//! ```yaml
//! clients: [A, B, C, D]      # rotation order
//! cores: 2
//! tick_interval_ms: 1000
//! injection_interval_ms: 700 # 0 disables automatic injection
//! tick_duration_ms: 1000     # defaults to tick_interval_ms
//! seed: 42                   # optional, for reproducible runs
//! history:
//!   processed_cap: 50
//!   interval_cap: 200
//! ```
//!
//! Every field is optional; anything missing falls back to
//! [`SimConfig::default`].

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::client::{ClientId, ClientRegistry, DEFAULT_CLIENTS};
use crate::history::{DEFAULT_INTERVAL_CAP, DEFAULT_PROCESSED_CAP};
use crate::simulation::SimSettings;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Mirrors the YAML file layout.  Kept private – callers work with
/// [`SimConfig`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimConfigFile {
    #[serde(default)]
    clients: Vec<String>,
    cores: Option<usize>,
    tick_interval_ms: Option<u64>,
    injection_interval_ms: Option<u64>,
    tick_duration_ms: Option<u64>,
    seed: Option<u64>,
    #[serde(default)]
    history: HistoryEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct HistoryEntry {
    processed_cap: Option<usize>,
    interval_cap: Option<usize>,
}

// ── Public data structures ────────────────────────────────────────────────────

pub const DEFAULT_CORES: usize = 2;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_INJECTION_INTERVAL_MS: u64 = 700;

/// Fully-resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub clients: Vec<ClientId>,
    pub cores: usize,
    pub tick_interval_ms: u64,
    /// `0` = no automatic injection.
    pub injection_interval_ms: u64,
    /// Execution-interval width; `None` follows `tick_interval_ms`.
    pub tick_duration_ms: Option<u64>,
    pub seed: Option<u64>,
    pub processed_cap: usize,
    pub interval_cap: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            clients: DEFAULT_CLIENTS.iter().map(|&c| ClientId::new(c)).collect(),
            cores: DEFAULT_CORES,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            injection_interval_ms: DEFAULT_INJECTION_INTERVAL_MS,
            tick_duration_ms: None,
            seed: None,
            processed_cap: DEFAULT_PROCESSED_CAP,
            interval_cap: DEFAULT_INTERVAL_CAP,
        }
    }
}

impl SimConfig {
    /// Parse `path` into a resolved config.
    ///
    /// * An empty `clients` list falls back to the default `A..D` set.
    /// * `tick_duration_ms` defaults to `tick_interval_ms`.
    ///
    /// # Errors
    /// Unreadable file, invalid YAML, unknown keys, duplicate client names,
    /// or a zero core count / tick interval.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading simulation configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Parse a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as an empty map.
        let file: SimConfigFile = if content.trim().is_empty() {
            SimConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let defaults = Self::default();

        let clients = if file.clients.is_empty() {
            warn!("No clients in configuration, using default client set");
            defaults.clients
        } else {
            file.clients.into_iter().map(ClientId::new).collect()
        };

        let tick_interval_ms = file.tick_interval_ms.unwrap_or(defaults.tick_interval_ms);

        let config = Self {
            clients,
            cores: file.cores.unwrap_or(defaults.cores),
            tick_interval_ms,
            injection_interval_ms: file
                .injection_interval_ms
                .unwrap_or(defaults.injection_interval_ms),
            tick_duration_ms: file.tick_duration_ms,
            seed: file.seed,
            processed_cap: file.history.processed_cap.unwrap_or(defaults.processed_cap),
            interval_cap: file.history.interval_cap.unwrap_or(defaults.interval_cap),
        };
        config.validate()?;

        debug!(
            clients = ?config.clients,
            cores   = config.cores,
            tick_interval_ms      = config.tick_interval_ms,
            injection_interval_ms = config.injection_interval_ms,
            "configuration parsed"
        );
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        self.registry()?;
        anyhow::ensure!(self.cores > 0, "cores must be at least 1");
        anyhow::ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be non-zero");
        Ok(())
    }

    /// The fixed client order as a registry.
    pub fn registry(&self) -> Result<ClientRegistry> {
        ClientRegistry::new(self.clients.iter().cloned()).context("Invalid client list")
    }

    pub fn settings(&self) -> SimSettings {
        SimSettings {
            tick_duration_ms: self.tick_duration_ms.unwrap_or(self.tick_interval_ms),
            processed_cap: self.processed_cap,
            interval_cap: self.interval_cap,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// `None` when automatic injection is disabled.
    pub fn injection_interval(&self) -> Option<Duration> {
        (self.injection_interval_ms > 0).then(|| Duration::from_millis(self.injection_interval_ms))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn load_full_yaml() {
        let yaml = r#"
clients: [north, south, east, west, centre]
cores: 3
tick_interval_ms: 500
injection_interval_ms: 250
tick_duration_ms: 400
seed: 42
history:
  processed_cap: 10
  interval_cap: 20
"#;
        let f = yaml_tempfile(yaml);
        let cfg = SimConfig::load_from_file(f.path()).unwrap();

        let names: Vec<&str> = cfg.clients.iter().map(ClientId::as_str).collect();
        assert_eq!(names, vec!["north", "south", "east", "west", "centre"]);
        assert_eq!(cfg.cores, 3);
        assert_eq!(cfg.tick_interval(), Duration::from_millis(500));
        assert_eq!(cfg.injection_interval(), Some(Duration::from_millis(250)));
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(
            cfg.settings(),
            SimSettings {
                tick_duration_ms: 400,
                processed_cap: 10,
                interval_cap: 20,
            }
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let cfg = SimConfig::from_yaml("cores: 4\n").unwrap();
        assert_eq!(cfg.cores, 4);
        assert_eq!(cfg.clients, SimConfig::default().clients);
        assert_eq!(cfg.tick_interval_ms, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(cfg.processed_cap, DEFAULT_PROCESSED_CAP);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn tick_duration_defaults_to_tick_interval() {
        let cfg = SimConfig::from_yaml("tick_interval_ms: 250\n").unwrap();
        assert_eq!(cfg.tick_duration_ms, None);
        assert_eq!(cfg.settings().tick_duration_ms, 250);
    }

    #[test]
    fn tick_duration_follows_a_later_tick_interval_change() {
        let mut cfg = SimConfig::from_yaml("tick_interval_ms: 1000\n").unwrap();
        cfg.tick_interval_ms = 200;
        assert_eq!(cfg.settings().tick_duration_ms, 200);
    }

    #[test]
    fn explicit_tick_duration_is_kept() {
        let mut cfg = SimConfig::from_yaml("tick_duration_ms: 800\n").unwrap();
        cfg.tick_interval_ms = 200;
        assert_eq!(cfg.settings().tick_duration_ms, 800);
    }

    #[test]
    fn empty_document_is_all_defaults() {
        assert_eq!(SimConfig::from_yaml("").unwrap(), SimConfig::default());
    }

    #[test]
    fn empty_client_list_falls_back_to_defaults() {
        let cfg = SimConfig::from_yaml("clients: []\n").unwrap();
        assert_eq!(cfg.registry().unwrap(), ClientRegistry::default());
    }

    #[test]
    fn zero_injection_interval_disables_injection() {
        let cfg = SimConfig::from_yaml("injection_interval_ms: 0\n").unwrap();
        assert_eq!(cfg.injection_interval(), None);
    }

    #[test]
    fn duplicate_clients_are_rejected() {
        let err = SimConfig::from_yaml("clients: [A, B, A]\n").unwrap_err();
        assert!(format!("{err:#}").contains("more than once"), "got: {err:#}");
    }

    #[test]
    fn zero_cores_is_rejected() {
        assert!(SimConfig::from_yaml("cores: 0\n").is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(SimConfig::from_yaml("core_count: 2\n").is_err());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = SimConfig::load_from_file(Path::new("/nonexistent/path/sim.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(SimConfig::load_from_file(f.path()).is_err());
    }
}
