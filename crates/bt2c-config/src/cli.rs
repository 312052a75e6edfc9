//! Command-line overrides layered on top of a loaded [`NodeConfig`],
//! grounded on the teacher's CLI-plus-config-file split (config file
//! for the stable shape, flags for what an operator wants to flip
//! per-invocation).

use std::path::PathBuf;

use clap::Parser;

use crate::network_params::NetworkKind;
use crate::node_config::NodeConfig;

/// CLI overrides for `bt2c-node`. Every field is optional; an absent
/// flag leaves the loaded config's value untouched.
#[derive(Debug, Parser)]
#[command(name = "bt2c-node", about = "BT2C proof-of-stake node")]
pub struct CliArgs {
    /// Path to the TOML config file.
    #[arg(long, default_value = "bt2c.toml")]
    pub config: PathBuf,

    /// Override the configured network kind.
    #[arg(long, value_enum)]
    pub network: Option<CliNetworkKind>,

    /// Override the configured data directory.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Override the configured log filter.
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// `clap`-friendly mirror of [`NetworkKind`]; `clap::ValueEnum` can't
/// be derived directly on a type this crate also derives `serde`'s
/// lowercase renaming on, so the CLI gets its own small enum and
/// [`CliNetworkKind::into`] bridges the two.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliNetworkKind {
    /// See [`NetworkKind::Mainnet`].
    Mainnet,
    /// See [`NetworkKind::Testnet`].
    Testnet,
    /// See [`NetworkKind::Devnet`].
    Devnet,
}

impl From<CliNetworkKind> for NetworkKind {
    fn from(kind: CliNetworkKind) -> Self {
        match kind {
            CliNetworkKind::Mainnet => NetworkKind::Mainnet,
            CliNetworkKind::Testnet => NetworkKind::Testnet,
            CliNetworkKind::Devnet => NetworkKind::Devnet,
        }
    }
}

impl CliArgs {
    /// Apply these overrides onto a config loaded from `self.config`.
    pub fn apply(&self, mut config: NodeConfig) -> NodeConfig {
        if let Some(kind) = self.network {
            config.network_kind = kind.into();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(filter) = &self.log_filter {
            config.log_filter = filter.clone();
        }
        config
    }
}
