use crate::services::scanner::{ContentScanner, ScanResult};
use async_trait::async_trait;
use clamav_client::{clean, Tcp};
use std::str;
use std::time::{Duration, Instant};

/// clamd client. Always fail-closed: connection errors, unparseable replies
/// and timeouts are `ScanResult::Error`.
#[derive(Clone)]
pub struct ClamAVService {
    host: String,
    port: u16,
    /// Timeout in seconds for each scan operation
    timeout_secs: u64,
}

impl ClamAVService {
    /// Create a new ClamAVService.
    ///
    /// # Arguments
    /// * `host` - ClamAV daemon hostname
    /// * `port` - ClamAV daemon port (typically 3310)
    /// * `timeout_secs` - Upper bound for one scan, including connect
    pub fn new(host: String, port: u16, timeout_secs: u64) -> Self {
        Self {
            host,
            port,
            timeout_secs,
        }
    }

    /// Scan in-memory data using sync API inside spawn_blocking to avoid !Send tokio futures.
    pub async fn scan_bytes(&self, data: &[u8]) -> ScanResult {
        let start = Instant::now();
        tracing::debug!(host = %self.host, port = %self.port, size_bytes = data.len(), "Starting ClamAV scan");
        let data = data.to_vec();
        let host = self.host.clone();
        let port = self.port;

        let timeout_secs = self.timeout_secs;
        let result = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            tokio::task::spawn_blocking(move || {
                let address = format!("{}:{}", host, port);
                let connection = Tcp {
                    host_address: address.as_str(),
                };
                match clamav_client::scan_buffer(data.as_slice(), connection, None) {
                    Ok(response_bytes) => match clean(&response_bytes) {
                        Ok(true) => ScanResult::Clean,
                        Ok(false) => ScanResult::Infected(parse_virus_name(&response_bytes)),
                        Err(e) => {
                            ScanResult::Error(format!("Failed to parse ClamAV response: {}", e))
                        }
                    },
                    Err(e) => ScanResult::Error(format!("ClamAV scan error: {}", e)),
                }
            }),
        )
        .await;

        let verdict = match result {
            Ok(Ok(sr)) => sr,
            Ok(Err(e)) => ScanResult::Error(format!("ClamAV scan task join error: {}", e)),
            Err(_) => ScanResult::Error(format!(
                "ClamAV scan timeout (exceeded {} seconds)",
                timeout_secs
            )),
        };

        match &verdict {
            ScanResult::Clean => tracing::info!(
                duration_ms = start.elapsed().as_millis(),
                "File scan completed: clean"
            ),
            ScanResult::Infected(virus) => tracing::warn!(
                duration_ms = start.elapsed().as_millis(),
                virus = %virus,
                "File scan detected virus"
            ),
            ScanResult::Error(err) => tracing::error!(
                duration_ms = start.elapsed().as_millis(),
                error = %err,
                "ClamAV scan failed"
            ),
        }

        verdict
    }
}

#[async_trait]
impl ContentScanner for ClamAVService {
    async fn scan(&self, data: &[u8]) -> ScanResult {
        self.scan_bytes(data).await
    }
}

/// Pull the signature name out of a `stream: <name> FOUND` reply.
fn parse_virus_name(response: &[u8]) -> String {
    let response = str::from_utf8(response).map(str::trim).unwrap_or("");
    if !response.contains("FOUND") {
        return "unknown".to_string();
    }
    response
        .split(':')
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or("unknown")
        .to_string()
}
