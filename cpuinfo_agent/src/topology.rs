//! Socket / sibling / core counts derived from the parsed processor map.

use crate::types::{CpuSnapshot, ProcessorMap};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologySummary {
    /// Physical packages: 1 + highest `physical id`. Reports 1 for an empty map.
    pub real: u32,
    /// Logical processors per package, from the last record visited.
    pub siblings: u32,
    /// Physical cores per package, from the last record visited.
    pub cpu_cores: u32,
    pub total: u32,
    pub cores: u32,
}

fn real_processors(cpus: &ProcessorMap) -> u32 {
    let mut highest = 0;
    for cpu in cpus.values() {
        highest = highest.max(cpu.physical_id);
    }
    highest.saturating_add(1)
}

// Assumes every package reports the same numbers.
fn siblings(cpus: &ProcessorMap) -> u32 {
    cpus.last_key_value().map_or(0, |(_, c)| c.siblings)
}

fn cpu_cores(cpus: &ProcessorMap) -> u32 {
    cpus.last_key_value().map_or(0, |(_, c)| c.cpu_cores)
}

pub fn summarize(cpus: &ProcessorMap) -> TopologySummary {
    let real = real_processors(cpus);
    let siblings = siblings(cpus);
    let cpu_cores = cpu_cores(cpus);

    // one per-package figure per package index
    TopologySummary {
        real,
        siblings,
        cpu_cores,
        total: siblings.saturating_mul(real),
        cores: cpu_cores.saturating_mul(real),
    }
}

/// Combine the records with their summary into the response body.
pub fn snapshot(cpus: ProcessorMap) -> CpuSnapshot {
    let summary = summarize(&cpus);
    debug!(
        processors = cpus.len(),
        real = summary.real,
        siblings = summary.siblings,
        cpu_cores = summary.cpu_cores,
        "topology summarized"
    );
    CpuSnapshot {
        cpu: cpus,
        total: summary.total,
        real: summary.real,
        cores: summary.cores,
    }
}
