//! Key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Editing,
    /// Typing the path of a file to upload
    FilePrompt(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit,
    OpenFilePrompt,
    ClearFile,
    CopyReply,
    ClearText,
    Quit,
    Insert(char),
    Newline,
    Backspace,
    DismissNotice,
    PromptInsert(char),
    PromptBackspace,
    PromptConfirm,
    PromptCancel,
    None,
}

pub fn map_key(key: KeyEvent, mode: &InputMode, notice_open: bool) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    // A notice is modal: the next key only acknowledges it
    if notice_open {
        return Action::DismissNotice;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if let InputMode::FilePrompt(_) = mode {
        return match key.code {
            KeyCode::Enter => Action::PromptConfirm,
            KeyCode::Esc => Action::PromptCancel,
            KeyCode::Char('c') if ctrl => Action::PromptCancel,
            KeyCode::Backspace => Action::PromptBackspace,
            KeyCode::Char(c) if !ctrl => Action::PromptInsert(c),
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Enter if ctrl => Action::Submit,
        KeyCode::Char('s') if ctrl => Action::Submit,
        KeyCode::Char('o') if ctrl => Action::OpenFilePrompt,
        KeyCode::Char('x') if ctrl => Action::ClearFile,
        KeyCode::Char('y') if ctrl => Action::CopyReply,
        KeyCode::Char('l') if ctrl => Action::ClearText,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Esc => Action::Quit,
        KeyCode::Enter => Action::Newline,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Tab => Action::Insert('\t'),
        KeyCode::Char(c) if !ctrl => Action::Insert(c),
        _ => Action::None,
    }
}
