//! HTTP routes: the cpu snapshot at `/` and a liveness probe at `/status`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::error;

use crate::cpuinfo;
use crate::error::ReportError;
use crate::state::AppState;
use crate::topology::snapshot;
use crate::types::{CpuSnapshot, ErrorPayload, StatusPayload};

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        error!("{self}");
        let body = ErrorPayload {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(cpu_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

pub async fn cpu_handler(State(state): State<AppState>) -> Result<Json<CpuSnapshot>, ReportError> {
    let cpus = cpuinfo::load(&state.cpuinfo_path)?;
    Ok(Json(snapshot(cpus)))
}

pub async fn status_handler() -> Json<StatusPayload> {
    Json(StatusPayload { status: "okay" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn spawn_server(path: PathBuf) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = router(AppState::new(path));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }

    // Minimal HTTP/1.1 client: returns (status, headers, body).
    async fn get(addr: SocketAddr, path: &str) -> (u16, String, String) {
        let mut stream = TcpStream::connect(addr).await.expect("connect");
        let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
        stream.write_all(req.as_bytes()).await.expect("write");
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.expect("read");
        let text = String::from_utf8(raw).expect("utf8 response");
        let (head, body) = text.split_once("\r\n\r\n").expect("header terminator");
        let status = head
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .expect("status code");
        (status, head.to_ascii_lowercase(), body.to_string())
    }

    fn fixture_path(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("cpuinfo");
        std::fs::write(&path, include_str!("../tests/data/cpuinfo_two_sockets.txt"))
            .expect("write fixture");
        path
    }

    #[tokio::test]
    async fn root_serves_snapshot_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let addr = spawn_server(fixture_path(&dir)).await;

        let (status, head, body) = get(addr, "/").await;
        assert_eq!(status, 200);
        assert!(head.contains("content-type: application/json"), "{head}");

        let v: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(v["real"], 2);
        assert_eq!(v["total"], 4);
        assert_eq!(v["cores"], 4);
        let cpu = v["cpu"].as_object().expect("cpu object");
        assert_eq!(cpu.len(), 4);
        let p3 = &cpu["3"];
        assert!(p3.get("processor").is_none());
        assert_eq!(p3["vendor_id"], "GenuineIntel");
        assert_eq!(p3["mode_name"], "Intel(R) Xeon(R) CPU E5-2609 0 @ 2.40GHz");
        assert_eq!(p3["physical_id"], 1);
        assert_eq!(p3["core_id"], 1);
        assert_eq!(p3["cpu_cores"], 2);
        assert_eq!(p3["initial_apicid"], 34);
        assert_eq!(p3["fpu_exception"], "yes");
        assert_eq!(p3["flags"][0], "fpu");
        assert_eq!(p3["power_management"], "");
        assert!((p3["cpu_mhz"].as_f64().expect("mhz") - 2400.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn report_is_read_fresh_per_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cpuinfo");
        std::fs::write(&path, "processor : 0\nphysical id : 0\n").expect("write");
        let addr = spawn_server(path.clone()).await;

        let (_, _, body) = get(addr, "/").await;
        let v: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(v["real"], 1);

        std::fs::write(&path, "processor : 0\nphysical id : 0\n\nprocessor : 1\nphysical id : 1\n")
            .expect("rewrite");
        let (_, _, body) = get(addr, "/").await;
        let v: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(v["real"], 2);
        assert_eq!(v["cpu"].as_object().map(|m| m.len()), Some(2));
    }

    #[tokio::test]
    async fn missing_report_fails_root_but_not_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let addr = spawn_server(dir.path().join("missing")).await;

        let (status, _, body) = get(addr, "/").await;
        assert_eq!(status, 500);
        let v: serde_json::Value = serde_json::from_str(&body).expect("json error");
        assert!(v["error"].as_str().is_some_and(|e| e.contains("missing")));

        let (status, head, body) = get(addr, "/status").await;
        assert_eq!(status, 200);
        assert!(head.contains("content-type: application/json"));
        assert_eq!(body, r#"{"status":"okay"}"#);
    }
}
