//! Connectivity adapter reading the kernel's network interface table
//!
//! The radio counts as on when any non-loopback interface under
//! `/sys/class/net` reports an `operstate` of `up`.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::Connectivity;

const LOOPBACK: &str = "lo";

#[derive(Debug, Clone)]
pub struct SysfsConnectivity {
    net_dir: PathBuf,
}

impl SysfsConnectivity {
    pub fn new(net_dir: impl Into<PathBuf>) -> Self {
        Self {
            net_dir: net_dir.into(),
        }
    }

    fn interface_is_up(dir: &Path) -> bool {
        match fs::read_to_string(dir.join("operstate")) {
            Ok(state) => state.trim() == "up",
            Err(_) => false,
        }
    }
}

impl Connectivity for SysfsConnectivity {
    fn has_active_network(&self) -> bool {
        let entries = match fs::read_dir(&self.net_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read {:?}: {}", self.net_dir, e);
                return false;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            if name.to_str() == Some(LOOPBACK) {
                continue;
            }
            if Self::interface_is_up(&entry.path()) {
                debug!("Interface {:?} is up", name);
                return true;
            }
        }

        false
    }
}
