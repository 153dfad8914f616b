use std::time::Instant;

use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod browser_view;
pub mod log_view;
pub mod profile_card;

pub use browser_view::{BrowserComponent, ViewMode};
pub use log_view::LogViewComponent;
pub use profile_card::{Profile, ProfileCardComponent};

/// UI metadata handed to hosted components.
#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self { focused }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Anything that can live in a window's content slot.
///
/// Windows never inspect what they host. Mouse events arrive localized to
/// the content area, so `(0, 0)` is the content's top-left cell.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }

    /// Called once per frame so components can pick up background results.
    fn tick(&mut self, _now: Instant) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct Inert;
    impl Component for Inert {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }

    #[test]
    fn default_handle_event_returns_false() {
        let mut c = Inert;
        let event = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert!(!c.handle_event(&event, &ComponentContext::default()));
    }
}
