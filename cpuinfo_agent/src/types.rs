//! Data types sent to the client as JSON.
//! Keep this module minimal and stable — it defines the wire format.

use serde::Serialize;
use std::collections::BTreeMap;

/// Processor id -> record, as read from one report.
pub type ProcessorMap = BTreeMap<u32, ProcessorRecord>;

/// One logical processor block of the report.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct ProcessorRecord {
    // carried by the map key only
    #[serde(skip)]
    pub processor: u32,
    pub vendor_id: String,
    pub cpu_family: u32,
    pub model: u32,
    // existing consumers read this spelling
    #[serde(rename = "mode_name")]
    pub model_name: String,
    pub stepping: u32,
    pub cpu_mhz: f32,
    pub cache_size: String,
    pub physical_id: u32,
    pub siblings: u32,
    pub core_id: u32,
    pub cpu_cores: u32,
    pub apicid: u32,
    pub initial_apicid: u32,
    pub fpu: String,
    pub fpu_exception: String,
    pub cpuid_level: u32,
    pub wp: String,
    pub flags: Vec<String>,
    pub bogomips: f32,
    pub clflush_size: u32,
    pub cache_alignment: u32,
    pub address_sizes: String,
    pub power_management: String,
}

/// Response body of `GET /`.
#[derive(Debug, Serialize, Clone)]
pub struct CpuSnapshot {
    pub cpu: ProcessorMap,
    // logical processors summed over packages
    pub total: u32,
    // physical packages
    pub real: u32,
    // physical cores summed over packages
    pub cores: u32,
}

#[derive(Debug, Serialize, Clone)]
pub struct StatusPayload {
    pub status: &'static str,
}

#[derive(Debug, Serialize, Clone)]
pub struct ErrorPayload {
    pub error: String,
}
