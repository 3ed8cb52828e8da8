//! HTTP client for the classification API
//!
//! `POST {base_url}/classify` with a multipart body (`file`, `text`) and
//! `GET {origin}/health` for the liveness probe.

use super::error_body::{extract_error_detail, status_error};
use super::ClassificationService;
use crate::service::config::AppConfig;
use crate::service::health::HealthStatus;
use crate::util::errors::{ClassifierError, ClassifierResult};
use crate::util::types::{ClassificationRequest, ClassificationResult, RawClassification};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct HealthBody {
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClassifierClient {
    client: reqwest::Client,
    classify_url: String,
    health_url: Url,
}

impl ClassifierClient {
    pub fn new(config: &AppConfig) -> ClassifierResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(format!("email-classifier/{}", crate::VERSION));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClassifierError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            classify_url: config.classify_url(),
            health_url: config.health_url()?,
        })
    }

    pub fn classify_url(&self) -> &str {
        &self.classify_url
    }

    fn build_form(request: &ClassificationRequest) -> Form {
        let mut form = Form::new();
        if let Some(file) = &request.file {
            let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            form = form.part("file", part);
        }
        if let Some(text) = &request.text {
            form = form.text("text", text.clone());
        }
        form
    }
}

#[async_trait]
impl ClassificationService for ClassifierClient {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> ClassifierResult<ClassificationResult> {
        info!(
            "Sending classification request: url={}, has_text={}, has_file={}",
            self.classify_url,
            request.text.is_some(),
            request.file.is_some()
        );

        let response = self
            .client
            .post(&self.classify_url)
            .multipart(Self::build_form(request))
            .send()
            .await
            .map_err(|e| {
                error!("Classification request failed: {}", e);
                ClassifierError::Network(e.to_string())
            })?;

        let status = response.status();
        debug!("Classification response status: {}", status.as_u16());

        if !status.is_success() {
            let body = match response.bytes().await {
                Ok(body) => body.to_vec(),
                Err(e) => {
                    warn!("Failed to read error body: {}", e);
                    Vec::new()
                }
            };
            let detail = extract_error_detail(status.as_u16(), &body);
            warn!(
                "Classification rejected: status={}, detail={}",
                status.as_u16(),
                detail
            );
            return Err(status_error(status.as_u16(), detail));
        }

        let body = response.bytes().await?;
        let raw: RawClassification = serde_json::from_slice(&body).map_err(|e| {
            error!("Invalid classification body: {}", e);
            ClassifierError::InvalidResponse(format!("Invalid JSON response: {}", e))
        })?;

        let result = raw.into_result()?;
        info!(
            "Classification received: category={}, confidence={}",
            result.category.label(),
            result.confidence
        );
        Ok(result)
    }

    async fn check_health(&self) -> HealthStatus {
        match self.client.get(self.health_url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                let version = response
                    .json::<HealthBody>()
                    .await
                    .ok()
                    .and_then(|body| body.version);
                HealthStatus::Online { version }
            }
            Ok(response) => HealthStatus::Offline {
                reason: format!("HTTP {}", response.status().as_u16()),
            },
            Err(e) => HealthStatus::Offline {
                reason: e.to_string(),
            },
        }
    }
}
