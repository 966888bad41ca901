//! Router state. Only immutable settings live here; every request re-reads the report.

use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub cpuinfo_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(cpuinfo_path: PathBuf) -> Self {
        Self {
            cpuinfo_path: Arc::new(cpuinfo_path),
        }
    }
}
