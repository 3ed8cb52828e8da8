//! Submission flow: validate -> Loading -> one request -> Result or Idle.

use super::state::{AppModel, SubmitError};
use crate::infrastructure::api::ClassificationService;
use crate::util::errors::ClassifierResult;
use crate::util::types::{ClassificationRequest, ClassificationResult};
use log::{debug, error};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type ClassificationOutcome = ClassifierResult<ClassificationResult>;

#[derive(Clone)]
pub struct SubmissionController {
    service: Arc<dyn ClassificationService>,
}

impl SubmissionController {
    pub fn new(service: Arc<dyn ClassificationService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> Arc<dyn ClassificationService> {
        self.service.clone()
    }

    /// Runs the whole flow against `model`, awaiting the request in place.
    pub async fn submit(&self, model: &mut AppModel) -> Result<(), SubmitError> {
        let request = model.begin_submit(Instant::now())?;
        let outcome = self.service.classify(&request).await;
        Self::complete(model, outcome)
    }

    /// Sends the request on a background task; the outcome arrives on `tx`.
    pub fn spawn(
        &self,
        request: ClassificationRequest,
        tx: mpsc::UnboundedSender<ClassificationOutcome>,
    ) -> JoinHandle<()> {
        let service = self.service.clone();
        tokio::spawn(async move {
            let outcome = service.classify(&request).await;
            if tx.send(outcome).is_err() {
                debug!("Classification outcome dropped: receiver closed");
            }
        })
    }

    /// Applies a settled request to the model.
    pub fn complete(
        model: &mut AppModel,
        outcome: ClassificationOutcome,
    ) -> Result<(), SubmitError> {
        let now = Instant::now();
        match outcome {
            Ok(result) => {
                model.finish_success(result, now);
                Ok(())
            }
            Err(e) => {
                error!("Classification failed: {}", e);
                model.finish_failure(&e, now);
                Err(SubmitError::Failed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::config::AppConfig;
    use crate::service::health::HealthStatus;
    use crate::session::state::ViewState;
    use crate::util::errors::ClassifierError;
    use crate::util::types::Category;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeService {
        calls: AtomicUsize,
        fail_with_status: Option<u16>,
    }

    impl FakeService {
        fn new(fail_with_status: Option<u16>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with_status,
            })
        }
    }

    #[async_trait]
    impl ClassificationService for FakeService {
        async fn classify(
            &self,
            request: &ClassificationRequest,
        ) -> ClassifierResult<ClassificationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.fail_with_status {
                return Err(crate::infrastructure::api::status_error(
                    status,
                    "Texto inválido".to_string(),
                ));
            }
            Ok(ClassificationResult {
                category: Category::Productive,
                confidence: 87,
                rationale: format!("len={}", request.text.as_deref().unwrap_or("").len()),
                suggested_reply: "Ok".to_string(),
            })
        }

        async fn check_health(&self) -> HealthStatus {
            HealthStatus::Online { version: None }
        }
    }

    #[tokio::test]
    async fn invalid_input_sends_nothing() {
        let service = FakeService::new(None);
        let controller = SubmissionController::new(service.clone());
        let mut model = AppModel::new(AppConfig::default());
        model.set_text("curto");

        let err = controller.submit(&mut model).await.unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(_)));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert_eq!(model.view(), &ViewState::Idle);
    }

    #[tokio::test]
    async fn success_sends_exactly_one_request() {
        let service = FakeService::new(None);
        let controller = SubmissionController::new(service.clone());
        let mut model = AppModel::new(AppConfig::default());
        model.set_text("Preciso pagar a fatura");

        controller.submit(&mut model).await.expect("classified");
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(model.view(), ViewState::Result(_)));
    }

    #[tokio::test]
    async fn bad_request_shows_invalid_data_with_detail() {
        let service = FakeService::new(Some(400));
        let controller = SubmissionController::new(service);
        let mut model = AppModel::new(AppConfig::default());
        model.set_text("Preciso pagar a fatura");

        let err = controller.submit(&mut model).await.unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Failed(ClassifierError::ClientStatus { status: 400, .. })
        ));
        assert_eq!(model.view(), &ViewState::Idle);
        assert_eq!(
            model.banner().map(|b| b.message.clone()),
            Some("Dados inválidos. Texto inválido".to_string())
        );
    }

    #[tokio::test]
    async fn spawned_request_reports_outcome() {
        let controller = SubmissionController::new(FakeService::new(Some(500)));
        let mut model = AppModel::new(AppConfig::default());
        model.set_text("Preciso pagar a fatura");
        let request = model.begin_submit(Instant::now()).expect("valid");

        let (tx, mut rx) = mpsc::unbounded_channel();
        controller.spawn(request, tx).await.expect("task completes");
        let outcome = rx.recv().await.expect("outcome sent");

        assert!(SubmissionController::complete(&mut model, outcome).is_err());
        assert_eq!(
            model.banner().map(|b| b.message.clone()),
            Some(model.config().messages.server_error.clone())
        );
    }
}
