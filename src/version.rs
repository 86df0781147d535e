//! Version information for parkd.

/// parkd version from Cargo.toml
pub const PARKD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version information reported by the health endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VersionInfo {
    pub parkd: &'static str,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            parkd: PARKD_VERSION,
        }
    }
}

impl VersionInfo {
    pub fn new() -> Self {
        Self::default()
    }
}
