//! `/proc/cpuinfo` parser: blank-line separated blocks of `key : value` lines,
//! one block per logical processor.

use crate::error::ReportError;
use crate::types::{ProcessorMap, ProcessorRecord};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

type Setter = fn(&mut ProcessorRecord, &str);

// Failed conversions fall back to zero; a bad field never drops the block.
fn int(v: &str) -> u32 {
    v.parse().unwrap_or(0)
}

fn float(v: &str) -> f32 {
    v.parse().unwrap_or(0.0)
}

// Keys not listed here are skipped, so newer kernels adding fields are harmless.
static FIELDS: Lazy<HashMap<&'static str, Setter>> = Lazy::new(|| {
    let table: [(&'static str, Setter); 24] = [
        ("processor", |r, v| r.processor = int(v)),
        ("vendor_id", |r, v| r.vendor_id = v.to_string()),
        ("cpu family", |r, v| r.cpu_family = int(v)),
        ("model", |r, v| r.model = int(v)),
        ("model name", |r, v| r.model_name = v.to_string()),
        ("stepping", |r, v| r.stepping = int(v)),
        ("cpu MHz", |r, v| r.cpu_mhz = float(v)),
        ("cache size", |r, v| r.cache_size = v.to_string()),
        ("physical id", |r, v| r.physical_id = int(v)),
        ("siblings", |r, v| r.siblings = int(v)),
        ("core id", |r, v| r.core_id = int(v)),
        ("cpu cores", |r, v| r.cpu_cores = int(v)),
        ("apicid", |r, v| r.apicid = int(v)),
        ("initial apicid", |r, v| r.initial_apicid = int(v)),
        ("fpu", |r, v| r.fpu = v.to_string()),
        ("fpu_exception", |r, v| r.fpu_exception = v.to_string()),
        ("cpuid level", |r, v| r.cpuid_level = int(v)),
        ("wp", |r, v| r.wp = v.to_string()),
        ("flags", |r, v| r.flags = v.split(' ').map(str::to_string).collect()),
        ("bogomips", |r, v| r.bogomips = float(v)),
        ("clflush size", |r, v| r.clflush_size = int(v)),
        ("cache_alignment", |r, v| r.cache_alignment = int(v)),
        ("address sizes", |r, v| r.address_sizes = v.to_string()),
        ("power management", |r, v| r.power_management = v.to_string()),
    ];
    table.into_iter().collect()
});

/// Read and parse the report at `path`. Only the read itself can fail.
pub fn load(path: &Path) -> Result<ProcessorMap, ReportError> {
    let text = fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&text))
}

/// Parse report text into one record per processor id.
///
/// A block ends at a blank (or colon-less) line or at end of input. Blocks in
/// which no recognized key appeared are discarded; a later block with an id
/// already seen replaces the earlier one.
pub fn parse(text: &str) -> ProcessorMap {
    let mut out = ProcessorMap::new();
    let mut current = ProcessorRecord::default();
    let mut dirty = false;

    for line in text.lines() {
        match line.split_once(':') {
            Some((key, value)) => {
                if let Some(set) = FIELDS.get(key.trim()) {
                    set(&mut current, value.trim());
                    dirty = true;
                }
            }
            None => {
                if dirty {
                    let done = std::mem::take(&mut current);
                    out.insert(done.processor, done);
                    dirty = false;
                }
            }
        }
    }
    if dirty {
        out.insert(current.processor, current);
    }
    out
}
