//! Classification API access

pub mod client;
pub mod error_body;

pub use client::ClassifierClient;
pub use error_body::{extract_error_detail, status_error};

use crate::service::health::HealthStatus;
use crate::util::errors::ClassifierResult;
use crate::util::types::{ClassificationRequest, ClassificationResult};
use async_trait::async_trait;

/// Seam between the submission flow and the network.
#[async_trait]
pub trait ClassificationService: Send + Sync {
    /// Sends exactly one classification request. Never retries.
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> ClassifierResult<ClassificationResult>;

    /// Liveness probe of the API host.
    async fn check_health(&self) -> HealthStatus;
}
