use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::topology::DEFAULT_VCENTER_PORT;

#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
pub struct Config {
    /// Base URL of the server that builds the topology graph.
    #[arg(long, env = "VCENTER_TOPOLOGY_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// vCenter host to prefill in the connection form.
    #[arg(long, env = "VCENTER_HOST", default_value = "")]
    pub host: String,

    #[arg(long, env = "VCENTER_USERNAME", default_value = "")]
    pub username: String,

    #[arg(long, env = "VCENTER_PORT", default_value_t = DEFAULT_VCENTER_PORT)]
    pub port: u16,

    /// Seconds before a topology request is abandoned.
    #[arg(long, env = "VCENTER_TOPOLOGY_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Directory that exported PNG images are written to.
    #[arg(long, env = "VCENTER_TOPOLOGY_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "VCENTER_TOPOLOGY_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
