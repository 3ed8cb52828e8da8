//! Periodic liveness probe of the classification API.

use crate::infrastructure::api::ClassificationService;
use crate::service::config::Messages;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HealthStatus {
    /// No probe has completed yet
    #[default]
    Unknown,
    Online {
        version: Option<String>,
    },
    Offline {
        reason: String,
    },
}

impl HealthStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, HealthStatus::Online { .. })
    }

    pub fn label(&self, messages: &Messages) -> String {
        match self {
            HealthStatus::Unknown => "…".to_string(),
            HealthStatus::Online { version: Some(v) } => {
                format!("{} (v{})", messages.api_online, v)
            }
            HealthStatus::Online { version: None } => messages.api_online.clone(),
            HealthStatus::Offline { .. } => messages.api_offline.clone(),
        }
    }
}

/// Background task probing the API at a fixed interval. The first probe runs
/// immediately. Dropping the monitor stops the task.
pub struct HealthMonitor {
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn spawn(
        service: Arc<dyn ClassificationService>,
        interval: Duration,
        tx: mpsc::UnboundedSender<HealthStatus>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last = HealthStatus::Unknown;

            loop {
                ticker.tick().await;
                let status = service.check_health().await;

                if status.is_online() != last.is_online() || last == HealthStatus::Unknown {
                    match &status {
                        HealthStatus::Offline { reason } => {
                            warn!("API health check failed: {}", reason)
                        }
                        _ => info!("API health status: {:?}", status),
                    }
                } else {
                    debug!("API health status unchanged: {:?}", status);
                }
                last = status.clone();

                if tx.send(status).is_err() {
                    debug!("Health status receiver dropped, stopping monitor");
                    break;
                }
            }
        });

        debug!("Health monitor started: interval={:?}", interval);
        Self { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
