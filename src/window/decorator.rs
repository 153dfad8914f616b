use ratatui::layout::Rect;

use crate::geometry::Point;
use crate::theme;
use crate::ui::{UiFrame, ellipsize};

/// What a pointer-down on a window's chrome means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHit {
    TitleBar,
    Close,
    ResizeGrip,
    Content,
    Border,
    Outside,
}

/// Draws window chrome and maps local points to chrome regions.
///
/// All coordinates are local to the window: `(0, 0)` is its top-left cell
/// and `width x height` its full size.
pub trait WindowDecorator: std::fmt::Debug {
    fn render(&self, frame: &mut UiFrame<'_>, width: u16, height: u16, title: &str, focused: bool);

    fn content_rect(&self, width: u16, height: u16) -> Rect;

    fn hit_test(&self, width: u16, height: u16, local: Point) -> FrameHit;
}

const CLOSE_LABEL: &str = "[x]";

/// Single-line title bar with a close control on the right and a resize grip
/// in the bottom-right corner.
#[derive(Debug, Default)]
pub struct StudioDecorator;

impl StudioDecorator {
    fn close_span(width: u16) -> Option<(u16, u16)> {
        let len = CLOSE_LABEL.len() as u16;
        if width < len + 2 {
            return None;
        }
        let start = width - len - 1;
        Some((start, start + len))
    }
}

impl WindowDecorator for StudioDecorator {
    fn render(&self, frame: &mut UiFrame<'_>, width: u16, height: u16, title: &str, focused: bool) {
        if width == 0 || height == 0 {
            return;
        }
        let right = width - 1;
        let bottom = height - 1;

        frame.fill(Rect::new(0, 0, width, 1), " ", theme::title_bar(focused));
        let close = Self::close_span(width);
        let title_room = close.map_or(width, |(start, _)| start.saturating_sub(1)) as usize;
        let label = ellipsize(title, title_room.saturating_sub(1));
        let label_len = label.chars().count() as u16;
        let title_x = ((title_room as u16).saturating_sub(label_len) / 2).max(1);
        frame.set_string(title_x, 0, &label, theme::title_bar(focused));
        if let Some((start, _)) = close {
            frame.set_string(start, 0, CLOSE_LABEL, theme::close_button());
        }

        if height < 2 {
            return;
        }
        for y in 1..bottom {
            frame.set_string(0, y, "│", theme::border());
            frame.set_string(right, y, "│", theme::border());
        }
        frame.fill(Rect::new(0, bottom, width, 1), "─", theme::border());
        frame.set_string(0, bottom, "└", theme::border());
        frame.set_string(right, bottom, "◢", theme::grip());
    }

    fn content_rect(&self, width: u16, height: u16) -> Rect {
        Rect::new(1, 1, width.saturating_sub(2), height.saturating_sub(2))
    }

    fn hit_test(&self, width: u16, height: u16, local: Point) -> FrameHit {
        let (w, h) = (width as i32, height as i32);
        if local.x < 0 || local.y < 0 || local.x >= w || local.y >= h {
            return FrameHit::Outside;
        }
        if local.y == 0 {
            if let Some((start, end)) = Self::close_span(width)
                && local.x >= start as i32
                && local.x < end as i32
            {
                return FrameHit::Close;
            }
            return FrameHit::TitleBar;
        }
        // The grip is two cells wide so it is easy to catch.
        if local.y == h - 1 && local.x >= w - 2 {
            return FrameHit::ResizeGrip;
        }
        let content = self.content_rect(width, height);
        if local.x >= content.x as i32
            && local.x < (content.x + content.width) as i32
            && local.y >= content.y as i32
            && local.y < (content.y + content.height) as i32
        {
            return FrameHit::Content;
        }
        FrameHit::Border
    }
}
