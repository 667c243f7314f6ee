// path: crates/broker/src/config.rs
use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_index_dir")]
    pub index_dir: String,
    #[serde(default = "default_max_scanned")]
    pub max_scanned: u64,
}

fn default_addr() -> String {
    "0.0.0.0:8080".into()
}
fn default_index_dir() -> String {
    "index".into()
}
fn default_max_scanned() -> u64 {
    1_000_000
}

impl BrokerConfig {
    pub fn from_env() -> Self {
        let addr = std::env::var("TZ_ADDR").unwrap_or_else(|_| default_addr());
        let index_dir = std::env::var("TZ_INDEX_DIR").unwrap_or_else(|_| default_index_dir());
        let max_scanned = std::env::var("TZ_MAX_SCANNED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_max_scanned);

        Self {
            addr,
            index_dir,
            max_scanned,
        }
    }
}
