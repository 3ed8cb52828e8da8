use classifier_core::{CategoryTone, ConfidenceLevel};
use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Cyan;
pub const MUTED: Color = Color::DarkGray;

pub fn category_badge(tone: CategoryTone) -> Style {
    let (fg, bg) = match tone {
        CategoryTone::Productive => (Color::Black, Color::Green),
        CategoryTone::Unproductive => (Color::Black, Color::Yellow),
        CategoryTone::Error => (Color::White, Color::Red),
    };
    Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD)
}

pub fn confidence_bar(level: ConfidenceLevel) -> Style {
    let color = match level {
        ConfidenceLevel::High => Color::Green,
        ConfidenceLevel::Medium => Color::Blue,
        ConfidenceLevel::Low => Color::LightRed,
    };
    Style::default().fg(color)
}

pub fn char_count(warning: bool) -> Style {
    if warning {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn error_banner() -> Style {
    Style::default().fg(Color::White).bg(Color::Red)
}

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}
