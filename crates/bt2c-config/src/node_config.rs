//! Top-level node configuration: storage location, this node's
//! validator identity, and the network preset, loaded from a TOML
//! file and overridable from the command line.
//!
//! Flattened from the teacher's `container::config::NodeConfig` (one
//! struct per subsystem) down to the handful of fields this workspace
//! actually needs — `bt2c-store`, `bt2c-mempool`, and the rest read
//! their tuning from call-site constants or `NetworkParams`, not from
//! a sprawling per-subsystem config tree.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::network_params::{NetworkKind, NetworkParams};

/// Node configuration as loaded from disk, before CLI overrides are
/// applied.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Which network preset this node runs.
    pub network_kind: NetworkKind,
    /// Directory holding the Store's on-disk files (RocksDB) or, for
    /// `InMemoryStore`, unused but still recorded.
    pub data_dir: PathBuf,
    /// Path to this node's Ed25519 keypair file, if it produces
    /// blocks. `None` for a non-validating observer node.
    pub validator_keypair_path: Option<PathBuf>,
    /// `tracing-subscriber::EnvFilter` directive string, e.g.
    /// `"bt2c=info"`. Overridden by `RUST_LOG` if set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl NodeConfig {
    /// This node's resolved network parameters.
    pub fn network_params(&self) -> NetworkParams {
        NetworkParams::for_kind(self.network_kind)
    }

    /// Load and parse a TOML config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network_kind: NetworkKind::Devnet,
            data_dir: PathBuf::from("./data"),
            validator_keypair_path: None,
            log_filter: default_log_filter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_minimal_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            network_kind = "testnet"
            data_dir = "/tmp/bt2c-data"
            "#
        )
        .unwrap();

        let cfg = NodeConfig::load(file.path()).unwrap();
        assert_eq!(cfg.network_kind, NetworkKind::Testnet);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/bt2c-data"));
        assert_eq!(cfg.log_filter, "info");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = NodeConfig::load(Path::new("/nonexistent/bt2c.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
