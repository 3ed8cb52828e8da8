//! One-shot commands (no TUI)

use anyhow::{anyhow, bail, Context, Result};
use classifier_core::{
    AppConfig, AppModel, ClassificationResult, ClassificationService, ClassifierClient,
    FileUpload, SubmissionController, SubmitError, ViewState,
};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Output format of `classify`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// `text` of `-` reads the email body from stdin.
pub async fn classify(
    config: AppConfig,
    text: Option<String>,
    file: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let client = ClassifierClient::new(&config).context("Failed to create API client")?;
    let controller = SubmissionController::new(Arc::new(client));
    let mut model = AppModel::new(config);

    if let Some(text) = text {
        let text = if text == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read email text from stdin")?;
            buf
        } else {
            text
        };
        let text = text.trim();
        check_text_length(text, model.config().limits.max_text_length)?;
        model.set_text(text);
    }

    if let Some(path) = file {
        let max = model.config().limits.max_file_size;
        let upload = FileUpload::from_path(&path, max)
            .await
            .map_err(|e| anyhow!(e.user_message(&model.config().messages)))
            .with_context(|| format!("Failed to load {}", path.display()))?;
        model
            .select_file(upload, Instant::now())
            .map_err(|e| anyhow!(e.user_message(&model.config().messages)))?;
    }

    match controller.submit(&mut model).await {
        Ok(()) => {}
        Err(SubmitError::Invalid(e)) => bail!(e.user_message(&model.config().messages)),
        Err(SubmitError::Failed(e)) => bail!(e.user_message(&model.config().messages)),
        Err(SubmitError::Busy) => bail!("A classification is already in progress"),
    }

    let ViewState::Result(view) = model.view() else {
        bail!(model.config().messages.unknown.clone());
    };
    info!(
        "Classification finished: category={}, confidence={}",
        view.category_label(),
        view.confidence_label
    );

    println!("{}", format_result(&view.result, format)?);
    Ok(())
}

/// The interactive editor stops accepting input at the limit; here an
/// oversized email is refused instead of being classified truncated.
fn check_text_length(text: &str, max: usize) -> Result<()> {
    let len = text.chars().count();
    if len > max {
        warn!("Email text rejected: {} characters, limit is {}", len, max);
        bail!(
            "Email text has {} characters; the limit is {}. Shorten it or send it as a file.",
            len,
            max
        );
    }
    Ok(())
}

pub fn format_result(result: &ClassificationResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => Ok(format!(
            "Categoria: {}\nConfiança: {}%\nRazão: {}\n\nResposta sugerida:\n{}",
            result.category.label(),
            result.confidence,
            result.rationale,
            result.suggested_reply
        )),
    }
}

pub async fn health(config: AppConfig) -> Result<()> {
    let client = ClassifierClient::new(&config).context("Failed to create API client")?;
    let status = client.check_health().await;
    println!("{}", status.label(&config.messages));

    if !status.is_online() {
        bail!("API health check failed: {:?}", status);
    }
    Ok(())
}
