//! UI state machine
//!
//! Idle -> Loading -> Result, with an error banner that can overlay any of
//! them and expires on its own. At most one submission is in flight.

use super::presentation::ResultView;
use crate::service::config::AppConfig;
use crate::service::health::HealthStatus;
use crate::service::validation::{check_file_size, validate_input};
use crate::util::errors::{ClassifierError, ValidationError};
use crate::util::types::{ClassificationRequest, ClassificationResult, FileUpload};
use log::{debug, info, warn};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Result(ResultView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Modal message acknowledged by the user (clipboard feedback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharCount {
    pub count: usize,
    /// Count is above the warning threshold
    pub warning: bool,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a classification is already in progress")]
    Busy,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Failed(ClassifierError),
}

pub struct AppModel {
    config: AppConfig,
    view: ViewState,
    banner: Option<ErrorBanner>,
    notice: Option<Notice>,
    text: String,
    char_count: CharCount,
    file: Option<FileUpload>,
    health: HealthStatus,
}

impl AppModel {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            view: ViewState::Idle,
            banner: None,
            notice: None,
            text: String::new(),
            char_count: CharCount::default(),
            file: None,
            health: HealthStatus::Unknown,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading)
    }

    pub fn banner(&self) -> Option<&ErrorBanner> {
        self.banner.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> CharCount {
        self.char_count
    }

    pub fn file(&self) -> Option<&FileUpload> {
        self.file.as_ref()
    }

    pub fn health(&self) -> &HealthStatus {
        &self.health
    }

    // ===== Text input =====

    /// Replaces the text, keeping at most `max_text_length` characters.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let max = self.config.limits.max_text_length;
        self.text = match text.char_indices().nth(max) {
            Some((cut, _)) => text[..cut].to_string(),
            None => text,
        };
        self.update_char_count();
    }

    /// Appends `input` up to the length cap. Returns false when nothing fit.
    pub fn insert_str(&mut self, input: &str) -> bool {
        let room = self
            .config
            .limits
            .max_text_length
            .saturating_sub(self.text.chars().count());
        if room == 0 || input.is_empty() {
            return false;
        }
        self.text.extend(input.chars().take(room));
        self.update_char_count();
        true
    }

    pub fn push_char(&mut self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf))
    }

    pub fn backspace(&mut self) {
        if self.text.pop().is_some() {
            self.update_char_count();
        }
    }

    pub fn clear_text(&mut self) {
        self.text.clear();
        self.update_char_count();
    }

    pub fn update_char_count(&mut self) -> CharCount {
        let count = self.text.chars().count();
        self.char_count = CharCount {
            count,
            warning: count > self.config.limits.char_warning_threshold,
        };
        self.char_count
    }

    // ===== File selection =====

    /// Accepts a file within the size limit; otherwise shows the error and
    /// clears the current selection.
    pub fn select_file(&mut self, upload: FileUpload, now: Instant) -> Result<(), ValidationError> {
        if let Err(e) = check_file_size(upload.size(), self.config.limits.max_file_size) {
            warn!("File rejected: name={}, {}", upload.file_name, e);
            let message = e.user_message(&self.config.messages);
            self.show_error(message, now);
            self.reset_file();
            return Err(e);
        }
        info!("File selected: {}", upload.label());
        self.file = Some(upload);
        Ok(())
    }

    /// A file could not be loaded at all.
    pub fn reject_file(&mut self, error: &ClassifierError, now: Instant) {
        warn!("File rejected: {}", error);
        let message = error.user_message(&self.config.messages);
        self.show_error(message, now);
        self.reset_file();
    }

    pub fn reset_file(&mut self) {
        self.file = None;
    }

    pub fn file_label(&self) -> Option<String> {
        self.file.as_ref().map(FileUpload::label)
    }

    // ===== Submission =====

    /// Idle/Result -> Loading. Validation failures show the banner and keep
    /// the current state.
    pub fn begin_submit(&mut self, now: Instant) -> Result<ClassificationRequest, SubmitError> {
        if self.is_loading() {
            debug!("Submit ignored: classification already in progress");
            return Err(SubmitError::Busy);
        }

        if let Err(e) = validate_input(Some(&self.text), self.file.is_some(), &self.config.limits) {
            let message = e.user_message(&self.config.messages);
            self.show_error(message, now);
            return Err(SubmitError::Invalid(e));
        }

        self.hide_error();
        self.view = ViewState::Loading;
        Ok(ClassificationRequest::new(Some(&self.text), self.file.clone()))
    }

    /// Loading -> Result
    pub fn finish_success(&mut self, result: ClassificationResult, now: Instant) {
        debug!(
            "Rendering result: category={}, confidence={}",
            result.category.label(),
            result.confidence
        );
        self.view = ViewState::Result(ResultView::new(result, &self.config, now));
    }

    /// Loading -> Idle with the classified message in the banner.
    pub fn finish_failure(&mut self, error: &ClassifierError, now: Instant) {
        let message = error.user_message(&self.config.messages);
        self.show_error(message, now);
        self.view = ViewState::Idle;
    }

    pub fn suggested_reply(&self) -> Option<&str> {
        match &self.view {
            ViewState::Result(view) => Some(view.result.suggested_reply.as_str()),
            _ => None,
        }
    }

    // ===== Overlays =====

    pub fn show_error(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        warn!("Error shown: {}", message);
        self.banner = Some(ErrorBanner {
            message,
            shown_at: now,
        });
    }

    pub fn hide_error(&mut self) {
        self.banner = None;
    }

    pub fn show_notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
    }

    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }

    pub fn set_health(&mut self, status: HealthStatus) {
        self.health = status;
    }

    /// Expires the error banner. Returns true when something changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let ttl = self.config.timing.error_auto_hide();
        match &self.banner {
            Some(banner) if now.saturating_duration_since(banner.shown_at) >= ttl => {
                self.banner = None;
                true
            }
            _ => false,
        }
    }
}
