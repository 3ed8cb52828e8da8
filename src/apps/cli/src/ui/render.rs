//! Frame rendering
//!
//! Pure function of the model: nothing here mutates state.

use super::input::InputMode;
use super::theme;
use classifier_core::{AppModel, NoticeKind, ResultView, ViewState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

const FILE_HINT: &str = "Ctrl+O para selecionar um arquivo (.txt/.pdf)";
const IDLE_HINT: &str = "Digite o email e pressione Ctrl+Enter (ou Ctrl+S) para classificar";
const BUTTON_LABEL: &str = "Classificar Email";
const KEYS_HELP: &str =
    "Ctrl+O arquivo | Ctrl+X remover | Ctrl+Y copiar | Ctrl+L limpar | Esc sair";

pub fn draw(frame: &mut Frame, model: &AppModel, mode: &InputMode, now: Instant) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, chunks[0]);
    draw_email(frame, chunks[1], model, mode);
    draw_file(frame, chunks[2], model);
    draw_result_panel(frame, chunks[3], model, now);
    draw_status(frame, chunks[4], model);

    if let Some(banner) = model.banner() {
        draw_error_banner(frame, area, &banner.message);
    }
    if let InputMode::FilePrompt(path) = mode {
        draw_file_prompt(frame, area, path);
    }
    if let Some(notice) = model.notice() {
        draw_notice(frame, area, notice.kind, &notice.text);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Line::from(vec![
        Span::styled("Classificador Inteligente de Emails", theme::title()),
        Span::styled(
            format!("  v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(theme::MUTED),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn draw_email(frame: &mut Frame, area: Rect, model: &AppModel, mode: &InputMode) {
    let count = model.char_count();
    let max = model.config().limits.max_text_length;
    let counter = Line::from(Span::styled(
        format!(" {}/{} ", count.count, max),
        theme::char_count(count.warning),
    ))
    .alignment(Alignment::Right);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Email ")
        .title_bottom(counter);
    let inner = block.inner(area);

    let mut lines: Vec<Line> = model.text().split('\n').map(|l| Line::raw(l.to_string())).collect();
    if *mode == InputMode::Editing && !model.is_loading() {
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled("▏", Style::default().fg(theme::ACCENT)));
        }
    }

    let rows = wrapped_rows(model.text(), inner.width.max(1) as usize);
    let scroll = rows.saturating_sub(inner.height as usize) as u16;

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn draw_file(frame: &mut Frame, area: Rect, model: &AppModel) {
    let content = match model.file_label() {
        Some(label) => Line::from(Span::styled(
            format!("📎 {}", label),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(FILE_HINT, Style::default().fg(theme::MUTED))),
    };
    let block = Block::default().borders(Borders::ALL).title(" Arquivo ");
    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_result_panel(frame: &mut Frame, area: Rect, model: &AppModel, now: Instant) {
    let block = Block::default().borders(Borders::ALL).title(" Resultado ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match model.view() {
        ViewState::Idle => {
            let hint = Paragraph::new(Span::styled(IDLE_HINT, Style::default().fg(theme::MUTED)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(hint, centered_line(inner));
        }
        ViewState::Loading => {
            let loading = Paragraph::new(Span::styled(
                model.config().messages.classifying.clone(),
                theme::title(),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(loading, centered_line(inner));
        }
        ViewState::Result(view) => draw_result(frame, inner, view, now),
    }
}

fn draw_result(frame: &mut Frame, area: Rect, view: &ResultView, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Min(3),
        ])
        .split(area);

    let badge = Line::from(vec![
        Span::styled(format!(" {} ", view.category_label()), theme::category_badge(view.tone)),
        Span::raw("  Confiança: "),
        Span::styled(
            view.confidence_label.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(badge), chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(theme::confidence_bar(view.level))
        .percent(u16::from(view.bar_fill(now)))
        .label(view.confidence_label.clone());
    frame.render_widget(gauge, chunks[1]);

    let rationale = Paragraph::new(view.result.rationale.clone())
        .block(Block::default().borders(Borders::TOP).title(" Razão "))
        .wrap(Wrap { trim: false });
    frame.render_widget(rationale, chunks[2]);

    let reply = Paragraph::new(view.result.suggested_reply.clone())
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title(" Resposta sugerida (Ctrl+Y copiar) "),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(reply, chunks[3]);
}

fn draw_status(frame: &mut Frame, area: Rect, model: &AppModel) {
    let messages = &model.config().messages;
    let button = if model.is_loading() {
        Span::styled(
            format!("[ {} ]", messages.processing),
            Style::default().fg(theme::MUTED),
        )
    } else {
        Span::styled(format!("[ {} ]", BUTTON_LABEL), theme::title())
    };

    let health_style = if model.health().is_online() {
        Style::default().fg(ratatui::style::Color::Green)
    } else {
        Style::default().fg(theme::MUTED)
    };

    let line = Line::from(vec![
        button,
        Span::raw("  "),
        Span::styled(model.health().label(messages), health_style),
        Span::raw("  "),
        Span::styled(KEYS_HELP, Style::default().fg(theme::MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    if area.width < 8 || area.height < 4 {
        return;
    }
    let width = area.width - 4;
    let rows = wrapped_rows(message, (width - 2) as usize) as u16;
    let banner_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width,
        height: (rows + 2).min(area.height - 1),
    };

    frame.render_widget(Clear, banner_area);
    let banner = Paragraph::new(message.to_string())
        .style(theme::error_banner())
        .block(Block::default().borders(Borders::ALL).title(" Erro "))
        .wrap(Wrap { trim: false });
    frame.render_widget(banner, banner_area);
}

fn draw_file_prompt(frame: &mut Frame, area: Rect, path: &str) {
    let popup = centered_rect(70, 3, area);
    frame.render_widget(Clear, popup);
    let prompt = Paragraph::new(Line::from(vec![
        Span::raw(path.to_string()),
        Span::styled("▏", Style::default().fg(theme::ACCENT)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Caminho do arquivo (Enter confirma, Esc cancela) "),
    );
    frame.render_widget(prompt, popup);
}

fn draw_notice(frame: &mut Frame, area: Rect, kind: NoticeKind, text: &str) {
    let popup = centered_rect(50, 5, area);
    frame.render_widget(Clear, popup);
    let style = match kind {
        NoticeKind::Info => theme::title(),
        NoticeKind::Error => theme::error_banner(),
    };
    let body = Text::from(vec![
        Line::from(Span::styled(text.to_string(), style)),
        Line::from(Span::styled(
            "(pressione qualquer tecla)",
            Style::default().fg(theme::MUTED),
        )),
    ]);
    let notice = Paragraph::new(body)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(notice, popup);
}

/// Visual rows `text` occupies when wrapped at `width` columns.
pub fn wrapped_rows(text: &str, width: usize) -> usize {
    let width = width.max(1);
    text.split('\n')
        .map(|line| {
            let w = UnicodeWidthStr::width(line);
            w.div_ceil(width).max(1)
        })
        .sum()
}

fn centered_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 1.min(area.height),
    }
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classifier_core::{AppConfig, Category, ClassificationResult};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn centers_popup_on_very_wide_terminals() {
        let area = Rect::new(0, 0, 1200, 40);
        let popup = centered_rect(70, 3, area);
        assert_eq!(popup.width, 840);
        assert_eq!(popup.height, 3);
        assert_eq!(popup.x, 180);
        assert_eq!(popup.y, 18);

        let tiny = centered_rect(50, 5, Rect::new(0, 0, 10, 2));
        assert_eq!((tiny.width, tiny.height), (5, 2));
    }

    #[test]
    fn counts_wrapped_rows() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("abcdefghij", 10), 1);
        assert_eq!(wrapped_rows("abcdefghijk", 10), 2);
        assert_eq!(wrapped_rows("a\nb\n", 10), 3);
        // wide characters take two columns
        assert_eq!(wrapped_rows("日本語日本語", 10), 2);
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_result_texts() {
        let mut model = AppModel::new(AppConfig::default());
        model.set_text("Preciso pagar a fatura");
        let now = Instant::now();
        model.begin_submit(now).expect("valid input");
        model.finish_success(
            ClassificationResult {
                category: Category::Productive,
                confidence: 87,
                rationale: "Pagamento pendente".to_string(),
                suggested_reply: "Vamos processar".to_string(),
            },
            now,
        );

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("test terminal");
        terminal
            .draw(|frame| draw(frame, &model, &InputMode::Editing, now))
            .expect("draw");

        let screen = buffer_text(&terminal);
        assert!(screen.contains("Produtivo"));
        assert!(screen.contains("87%"));
        assert!(screen.contains("Pagamento pendente"));
        assert!(screen.contains("Vamos processar"));
    }

    #[test]
    fn renders_loading_state() {
        let mut model = AppModel::new(AppConfig::default());
        model.set_text("Preciso pagar a fatura");
        model.begin_submit(Instant::now()).expect("valid input");

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("test terminal");
        terminal
            .draw(|frame| draw(frame, &model, &InputMode::Editing, Instant::now()))
            .expect("draw");

        let screen = buffer_text(&terminal);
        assert!(screen.contains("Processando..."));
    }
}
