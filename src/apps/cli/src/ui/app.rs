//! Interactive session: event loop driving the core state machine.

use super::input::{map_key, Action, InputMode};
use super::{init_terminal, render, restore_terminal};
use crate::clipboard::{ClipboardSink, SystemClipboard};
use anyhow::{Context, Result};
use classifier_core::{
    AppConfig, AppModel, ClassificationOutcome, ClassifierClient, FileUpload, HealthMonitor,
    HealthStatus, NoticeKind, SubmissionController, SubmitError,
};
use crossterm::event::{self, Event};
use ratatui::{backend::Backend, Terminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const TICK_RATE: Duration = Duration::from_millis(50);

pub struct App<C: ClipboardSink> {
    model: AppModel,
    controller: SubmissionController,
    mode: InputMode,
    clipboard: C,
    outcome_tx: mpsc::UnboundedSender<ClassificationOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<ClassificationOutcome>,
    health_rx: Option<mpsc::UnboundedReceiver<HealthStatus>>,
    health_monitor: Option<HealthMonitor>,
    should_quit: bool,
}

impl<C: ClipboardSink> App<C> {
    pub fn new(config: AppConfig, controller: SubmissionController, clipboard: C) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            model: AppModel::new(config),
            controller,
            mode: InputMode::Editing,
            clipboard,
            outcome_tx,
            outcome_rx,
            health_rx: None,
            health_monitor: None,
            should_quit: false,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn start_health_monitor(&mut self) {
        let Some(interval) = self.model.config().timing.health_check_interval() else {
            info!("Health check disabled");
            return;
        };
        let (tx, rx) = mpsc::unbounded_channel();
        self.health_monitor = Some(HealthMonitor::spawn(
            self.controller.service(),
            interval,
            tx,
        ));
        self.health_rx = Some(rx);
    }

    pub async fn handle_action(&mut self, action: Action) {
        let now = Instant::now();
        match action {
            Action::Submit => self.submit(now),
            Action::OpenFilePrompt => self.mode = InputMode::FilePrompt(String::new()),
            Action::ClearFile => self.model.reset_file(),
            Action::CopyReply => self.copy_reply(),
            Action::ClearText => self.model.clear_text(),
            Action::Quit => self.should_quit = true,
            Action::Insert(c) => {
                self.model.push_char(c);
            }
            Action::Newline => {
                self.model.push_char('\n');
            }
            Action::Backspace => self.model.backspace(),
            Action::DismissNotice => {
                self.model.dismiss_notice();
            }
            Action::PromptInsert(c) => {
                if let InputMode::FilePrompt(path) = &mut self.mode {
                    path.push(c);
                }
            }
            Action::PromptBackspace => {
                if let InputMode::FilePrompt(path) = &mut self.mode {
                    path.pop();
                }
            }
            Action::PromptConfirm => {
                let mode = std::mem::replace(&mut self.mode, InputMode::Editing);
                if let InputMode::FilePrompt(path) = mode {
                    let path = path.trim();
                    if !path.is_empty() {
                        self.load_file(expand_home(path)).await;
                    }
                }
            }
            Action::PromptCancel => self.mode = InputMode::Editing,
            Action::None => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        match &mut self.mode {
            InputMode::FilePrompt(path) => {
                path.extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
            }
            InputMode::Editing => {
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                if !self.model.insert_str(&normalized) {
                    debug!("Paste ignored: text length limit reached");
                }
            }
        }
    }

    fn submit(&mut self, now: Instant) {
        match self.model.begin_submit(now) {
            Ok(request) => {
                // The handle is not kept: the outcome comes back on the channel
                let _ = self.controller.spawn(request, self.outcome_tx.clone());
            }
            Err(SubmitError::Busy) => {}
            Err(e) => debug!("Submit rejected: {}", e),
        }
    }

    fn copy_reply(&mut self) {
        let Some(reply) = self.model.suggested_reply().map(str::to_string) else {
            return;
        };

        match self.clipboard.copy_text(&reply) {
            Ok(()) => {
                info!("Suggested reply copied to clipboard");
                let text = self.model.config().messages.copied.clone();
                self.model.show_notice(NoticeKind::Info, text);
            }
            Err(e) => {
                warn!("Failed to copy to clipboard: {}", e);
                let text = self.model.config().messages.copy_failed.clone();
                self.model.show_notice(NoticeKind::Error, text);
            }
        }
    }

    async fn load_file(&mut self, path: PathBuf) {
        let max = self.model.config().limits.max_file_size;
        let loaded = FileUpload::from_path(&path, max).await;
        let now = Instant::now();
        match loaded {
            Ok(upload) => {
                let _ = self.model.select_file(upload, now);
            }
            Err(e) => self.model.reject_file(&e, now),
        }
    }

    /// Applies settled requests and health reports. Returns true when the
    /// model changed.
    pub fn drain_events(&mut self) -> bool {
        let mut changed = false;

        while let Ok(outcome) = self.outcome_rx.try_recv() {
            let _ = SubmissionController::complete(&mut self.model, outcome);
            changed = true;
        }

        if let Some(rx) = self.health_rx.as_mut() {
            while let Ok(status) = rx.try_recv() {
                self.model.set_health(status);
                changed = true;
            }
        }

        changed
    }

    pub async fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|frame| render::draw(frame, &self.model, &self.mode, now))?;

            self.drain_events();

            if event::poll(TICK_RATE)? {
                match event::read()? {
                    Event::Key(key) => {
                        let action = map_key(key, &self.mode, self.model.notice().is_some());
                        self.handle_action(action).await;
                    }
                    Event::Paste(text) => self.handle_paste(&text),
                    _ => {}
                }
            }

            self.model.tick(Instant::now());

            if self.should_quit {
                if let Some(monitor) = &self.health_monitor {
                    monitor.stop();
                }
                return Ok(());
            }
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Runs the interactive TUI until the user quits.
pub async fn run(config: AppConfig) -> Result<()> {
    let client = ClassifierClient::new(&config).context("Failed to create API client")?;
    info!("Classification endpoint: {}", client.classify_url());

    let controller = SubmissionController::new(Arc::new(client));
    let mut app = App::new(config, controller, SystemClipboard::default());
    app.start_health_monitor();

    let mut session = init_terminal()?;
    let result = app.event_loop(&mut session.terminal).await;
    restore_terminal(session)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use classifier_core::{
        Category, ClassificationRequest, ClassificationResult, ClassificationService,
        ClassifierError, ClassifierResult, ViewState,
    };

    struct FakeService;

    #[async_trait]
    impl ClassificationService for FakeService {
        async fn classify(
            &self,
            request: &ClassificationRequest,
        ) -> ClassifierResult<ClassificationResult> {
            if request.text.as_deref() == Some("servidor fora do ar") {
                return Err(ClassifierError::Network("connection refused".to_string()));
            }
            Ok(ClassificationResult {
                category: Category::Productive,
                confidence: 87,
                rationale: "Solicitação".to_string(),
                suggested_reply: "Resposta pronta".to_string(),
            })
        }

        async fn check_health(&self) -> HealthStatus {
            HealthStatus::Online { version: None }
        }
    }

    #[derive(Default)]
    struct FakeClipboard {
        copied: Vec<String>,
        fail: bool,
    }

    impl ClipboardSink for FakeClipboard {
        fn copy_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no display");
            }
            self.copied.push(text.to_string());
            Ok(())
        }
    }

    fn app(clipboard: FakeClipboard) -> App<FakeClipboard> {
        App::new(
            AppConfig::default(),
            SubmissionController::new(Arc::new(FakeService)),
            clipboard,
        )
    }

    async fn settle(app: &mut App<FakeClipboard>) {
        let outcome = tokio::time::timeout(Duration::from_secs(5), app.outcome_rx.recv())
            .await
            .expect("outcome in time")
            .expect("channel open");
        let _ = SubmissionController::complete(&mut app.model, outcome);
    }

    async fn type_text(app: &mut App<FakeClipboard>, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Insert(c)).await;
        }
    }

    #[tokio::test]
    async fn submit_and_copy_reply() {
        let mut app = app(FakeClipboard::default());
        type_text(&mut app, "Preciso pagar a fatura").await;

        app.handle_action(Action::Submit).await;
        assert!(app.model().is_loading());
        settle(&mut app).await;
        assert!(matches!(app.model().view(), ViewState::Result(_)));

        app.handle_action(Action::CopyReply).await;
        assert_eq!(app.clipboard.copied, vec!["Resposta pronta".to_string()]);
        assert_eq!(
            app.model().notice().map(|n| n.kind),
            Some(NoticeKind::Info)
        );

        app.handle_action(Action::DismissNotice).await;
        assert!(app.model().notice().is_none());
    }

    #[tokio::test]
    async fn copy_failure_shows_error_notice() {
        let mut app = app(FakeClipboard {
            copied: Vec::new(),
            fail: true,
        });
        type_text(&mut app, "Preciso pagar a fatura").await;
        app.handle_action(Action::Submit).await;
        settle(&mut app).await;

        app.handle_action(Action::CopyReply).await;
        let notice = app.model().notice().expect("notice shown");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, app.model().config().messages.copy_failed);
    }

    #[tokio::test]
    async fn copy_without_result_does_nothing() {
        let mut app = app(FakeClipboard::default());
        app.handle_action(Action::CopyReply).await;
        assert!(app.clipboard.copied.is_empty());
        assert!(app.model().notice().is_none());
    }

    #[tokio::test]
    async fn network_failure_returns_to_idle() {
        let mut app = app(FakeClipboard::default());
        type_text(&mut app, "servidor fora do ar").await;
        app.handle_action(Action::Submit).await;
        settle(&mut app).await;

        assert_eq!(app.model().view(), &ViewState::Idle);
        assert_eq!(
            app.model().banner().map(|b| b.message.clone()),
            Some(app.model().config().messages.network_error.clone())
        );
    }

    #[tokio::test]
    async fn file_prompt_loads_file() {
        let path = std::env::temp_dir().join(format!(
            "email-classifier-upload-{}.txt",
            std::process::id()
        ));
        tokio::fs::write(&path, vec![b'a'; 2048])
            .await
            .expect("write temp file");

        let mut app = app(FakeClipboard::default());
        app.handle_action(Action::OpenFilePrompt).await;
        app.handle_paste(&path.to_string_lossy());
        app.handle_action(Action::PromptConfirm).await;

        assert_eq!(app.mode(), &InputMode::Editing);
        let label = app.model().file_label().expect("file selected");
        assert!(label.ends_with("(2.0KB)"));

        tokio::fs::remove_file(&path).await.expect("remove temp file");
    }

    #[tokio::test]
    async fn missing_file_shows_error() {
        let mut app = app(FakeClipboard::default());
        app.handle_action(Action::OpenFilePrompt).await;
        app.handle_paste("/nonexistent/email.txt");
        app.handle_action(Action::PromptConfirm).await;

        assert!(app.model().file().is_none());
        assert!(app.model().banner().is_some());
    }

    #[tokio::test]
    async fn paste_normalizes_line_endings() {
        let mut app = app(FakeClipboard::default());
        app.handle_paste("linha 1\r\nlinha 2");
        assert_eq!(app.model().text(), "linha 1\nlinha 2");
    }

    #[test]
    fn expands_home_prefix() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/mail.txt"), home.join("mail.txt"));
        }
        assert_eq!(expand_home("/tmp/mail.txt"), PathBuf::from("/tmp/mail.txt"));
    }
}
