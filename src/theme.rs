use ratatui::style::{Color, Modifier, Style};

// Centralized colors for the desk. Keep these as small helpers so widgets
// never hardcode a palette.

pub fn desktop_bg() -> Color {
    Color::Black
}

pub fn desktop_fg() -> Color {
    Color::Gray
}

pub fn window_bg() -> Color {
    Color::Reset
}

pub fn border() -> Style {
    Style::default().fg(Color::DarkGray).bg(window_bg())
}

pub fn title_bar(focused: bool) -> Style {
    if focused {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

pub fn close_button() -> Style {
    Style::default().bg(Color::Red).fg(Color::White)
}

pub fn grip() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn icon() -> Style {
    Style::default().fg(Color::White).bg(Color::DarkGray)
}

pub fn icon_label() -> Style {
    Style::default().fg(desktop_fg()).bg(desktop_bg())
}

pub fn status_bar() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

pub fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red)
}

pub fn button(active: bool) -> Style {
    if active {
        Style::default().bg(Color::Gray).fg(Color::Black)
    } else {
        Style::default().fg(Color::Gray)
    }
}

pub fn highlight() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn header() -> Style {
    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}
