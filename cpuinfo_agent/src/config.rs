//! Command line and environment configuration for the agent.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CPUINFO: &str = "/proc/cpuinfo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub port: u16,
    pub cpuinfo_path: PathBuf,
    pub enable_ssl: bool,
}

fn usage(prog: &str) -> String {
    format!(
        "Usage: {prog} [--port PORT|-p PORT] [--cpuinfo PATH|-c PATH] [--enableSSL]\n\
         Env: CPUINFO_AGENT_PORT, CPUINFO_AGENT_PATH, RUST_LOG"
    )
}

/// Parse args, falling back to the process environment.
/// `Err` carries the text to print (help or usage error).
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<AgentConfig, String> {
    parse_args_with_env(args, |k| std::env::var(k).ok())
}

pub fn parse_args_with_env<I, F>(args: I, env: F) -> Result<AgentConfig, String>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "cpuinfo_agent".into());
    let mut port: Option<String> = None;
    let mut cpuinfo: Option<String> = None;
    let mut enable_ssl = false;

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(usage(&prog)),
            "--port" | "-p" => port = it.next(),
            "--cpuinfo" | "-c" => cpuinfo = it.next(),
            "--enableSSL" => enable_ssl = true,
            _ if arg.starts_with("--port=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    port = Some(v.to_string());
                }
            }
            _ if arg.starts_with("--cpuinfo=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        cpuinfo = Some(v.to_string());
                    }
                }
            }
            _ => {
                return Err(format!("Unexpected argument '{arg}'. {}", usage(&prog)));
            }
        }
    }

    let port = match port.or_else(|| env("CPUINFO_AGENT_PORT")) {
        Some(p) => p
            .parse::<u16>()
            .map_err(|_| format!("Invalid port '{p}'. {}", usage(&prog)))?,
        None => DEFAULT_PORT,
    };
    let cpuinfo_path = cpuinfo
        .or_else(|| env("CPUINFO_AGENT_PATH"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CPUINFO));

    Ok(AgentConfig {
        port,
        cpuinfo_path,
        enable_ssl,
    })
}
