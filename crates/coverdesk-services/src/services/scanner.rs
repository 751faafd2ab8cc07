use async_trait::async_trait;
use coverdesk_core::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    Clean,
    Infected(String),
    Error(String),
}

impl ScanResult {
    /// Map a verdict onto the request outcome. Only `Clean` passes.
    ///
    /// The signature name is logged here and never returned to the client.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            ScanResult::Clean => {
                tracing::debug!("Upload passed virus scan");
                Ok(())
            }
            ScanResult::Infected(virus_name) => {
                tracing::warn!(virus = %virus_name, "Rejected infected upload");
                Err(AppError::UnsafeContent(virus_name))
            }
            ScanResult::Error(err) => {
                tracing::error!(error = %err, "Virus scan unavailable");
                Err(AppError::ScanUnavailable(err))
            }
        }
    }
}

/// Verdict source for uploaded bytes.
///
/// Implementations must never report `Clean` when the scan did not complete.
#[async_trait]
pub trait ContentScanner: Send + Sync {
    async fn scan(&self, data: &[u8]) -> ScanResult;
}
