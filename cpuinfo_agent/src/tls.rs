//! Self-signed TLS material for `--enableSSL`, kept under the XDG config dir.

use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

fn config_dir() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| Path::new(&h).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cpuinfo_agent")
        .join("tls")
}

pub fn cert_paths_in(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("cert.pem"), dir.join("key.pem"))
}

fn subject_alt_names(hostname: Option<String>) -> Vec<String> {
    let mut sans = vec![
        "localhost".to_string(),
        "127.0.0.1".to_string(),
        "::1".to_string(),
    ];
    if let Some(h) = hostname.filter(|h| !h.is_empty() && h != "localhost") {
        sans.insert(0, h);
    }
    sans
}

/// Cert/key under the XDG config dir, generated on first use.
pub fn ensure_self_signed_cert() -> anyhow::Result<(PathBuf, PathBuf)> {
    ensure_self_signed_cert_in(&config_dir())
}

/// Return existing cert/key paths in `dir`, generating a fresh pair if either is missing.
pub fn ensure_self_signed_cert_in(dir: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
    let (cert_path, key_path) = cert_paths_in(dir);
    if cert_path.exists() && key_path.exists() {
        return Ok((cert_path, key_path));
    }
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let hostname = hostname::get().ok().and_then(|s| s.into_string().ok());
    let certified = rcgen::generate_simple_self_signed(subject_alt_names(hostname))
        .context("generate certificate")?;
    fs::write(&cert_path, certified.cert.pem())
        .with_context(|| format!("write {}", cert_path.display()))?;
    fs::write(&key_path, certified.key_pair.serialize_pem())
        .with_context(|| format!("write {}", key_path.display()))?;

    info!(
        cert = %cert_path.display(),
        key = %key_path.display(),
        "generated self-signed TLS certificate"
    );
    Ok((cert_path, key_path))
}
