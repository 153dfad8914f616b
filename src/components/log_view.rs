use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use ratatui::layout::Rect;

use super::{Component, ComponentContext};
use crate::log_buffer::LogHandle;
use crate::theme;
use crate::ui::UiFrame;

/// Activity Log window: tails the in-memory log buffer.
///
/// Follows new output while scrolled to the bottom; scrolling up pins the
/// view until `End` is pressed.
#[derive(Debug)]
pub struct LogViewComponent {
    handle: LogHandle,
    /// Lines hidden below the view; zero means following.
    scroll_back: usize,
    last_view: usize,
}

impl LogViewComponent {
    pub fn new(handle: LogHandle) -> Self {
        Self {
            handle,
            scroll_back: 0,
            last_view: 0,
        }
    }

    pub fn is_following(&self) -> bool {
        self.scroll_back == 0
    }

    fn scroll(&mut self, delta: isize) {
        let max = self.handle.len().saturating_sub(self.last_view.max(1));
        self.scroll_back = if delta.is_negative() {
            self.scroll_back.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_back.saturating_add(delta as usize).min(max)
        };
    }
}

impl Component for LogViewComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        let view = area.height as usize;
        self.last_view = view;
        if view == 0 {
            return;
        }
        if self.handle.is_empty() {
            frame.set_string(area.x, area.y, "No activity yet.", theme::muted());
            return;
        }
        for (row, line) in self.handle.tail(view, self.scroll_back).iter().enumerate() {
            let style = if line.contains("WARN") || line.contains("ERROR") || line.contains("PANIC") {
                theme::error()
            } else {
                ratatui::style::Style::default()
            };
            frame.set_string(area.x, area.y + row as u16, line, style);
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let page = self.last_view.max(1) as isize;
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.scroll(1),
                KeyCode::Down | KeyCode::Char('j') => self.scroll(-1),
                KeyCode::PageUp => self.scroll(page),
                KeyCode::PageDown => self.scroll(-page),
                KeyCode::Home => self.scroll(isize::MAX),
                KeyCode::End => self.scroll_back = 0,
                _ => return false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll(3),
                MouseEventKind::ScrollDown => self.scroll(-3),
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}
