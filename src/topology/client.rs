use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::model::TopologySnapshot;
use super::wire::parse_network_data;

pub const DEFAULT_VCENTER_PORT: u16 = 443;

const NETWORK_DATA_PATH: &str = "/api/network-data";

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: u16,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("topology response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct TopologyClient {
    http: Client,
    endpoint: String,
}

impl TopologyClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}{NETWORK_DATA_PATH}", api_base.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn fetch(&self, credentials: &Credentials) -> Result<TopologySnapshot, FetchError> {
        info!(
            endpoint = self.endpoint.as_str(),
            host = credentials.host.as_str(),
            port = credentials.port,
            "requesting topology"
        );

        let request_error = |source| FetchError::Request {
            url: self.endpoint.clone(),
            source,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(credentials)
            .send()
            .map_err(request_error)?;

        let status = response.status();
        let body = response.text().map_err(request_error)?;

        if !status.is_success() {
            warn!(%status, "topology request rejected");
            return Err(FetchError::Status { status, body });
        }

        Ok(parse_network_data(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            host: "vcenter.lab".to_owned(),
            username: "administrator@vsphere.local".to_owned(),
            password: "s3cret".to_owned(),
            port: DEFAULT_VCENTER_PORT,
        }
    }

    fn header_end(buffer: &[u8]) -> Option<usize> {
        buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .map(|index| index + 4)
    }

    fn content_length(headers: &str) -> usize {
        headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Serves one request with `status` and `body`, returning the raw request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let base = format!("http://{}", listener.local_addr().expect("local addr"));

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept connection");
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];

            loop {
                let read = stream.read(&mut chunk).expect("read request");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);

                if let Some(end) = header_end(&request) {
                    let headers = String::from_utf8_lossy(&request[..end]).into_owned();
                    if request.len() >= end + content_length(&headers) {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .expect("write response");

            String::from_utf8_lossy(&request).into_owned()
        });

        (base, handle)
    }

    #[test]
    fn posts_credentials_and_decodes_topology() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"nodes":[{"id":"vm-1","type":"vm","name":"web01","data":{},"position":{"x":0,"y":600}}],"edges":[]}"#,
        );

        let client = TopologyClient::new(&format!("{base}/"), Duration::from_secs(5))
            .expect("client");
        let snapshot = client.fetch(&credentials()).expect("fetch topology");
        assert_eq!(snapshot.node_count(), 1);
        assert_eq!(snapshot.nodes()[0].name, "web01");

        let request = server.join().expect("server thread");
        assert!(request.starts_with("POST /api/network-data HTTP/1.1"));
        assert!(request.contains(r#""host":"vcenter.lab""#));
        assert!(request.contains(r#""port":443"#));
        assert!(request.contains(r#""password":"s3cret""#));
    }

    #[test]
    fn non_success_status_is_an_error() {
        let (base, server) = serve_once(
            "500 Internal Server Error",
            r#"{"detail":"Failed to connect to vCenter"}"#,
        );

        let client = TopologyClient::new(&base, Duration::from_secs(5)).expect("client");
        let error = client.fetch(&credentials()).expect_err("status error");
        assert!(matches!(
            error,
            FetchError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
        server.join().expect("server thread");
    }

    #[test]
    fn malformed_body_is_an_error() {
        let (base, server) = serve_once("200 OK", "not json");

        let client = TopologyClient::new(&base, Duration::from_secs(5)).expect("client");
        let error = client.fetch(&credentials()).expect_err("decode error");
        assert!(matches!(error, FetchError::Decode(_)));
        server.join().expect("server thread");
    }

    #[test]
    fn unreachable_server_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        drop(listener);

        let client = TopologyClient::new(&base, Duration::from_secs(2)).expect("client");
        let error = client.fetch(&credentials()).expect_err("connection error");
        assert!(matches!(error, FetchError::Request { .. }));
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", credentials());
        assert!(rendered.contains("vcenter.lab"));
        assert!(!rendered.contains("s3cret"));
    }
}
