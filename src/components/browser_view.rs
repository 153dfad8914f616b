//! Window content for [`RemoteTreeBrowser`]: toolbar, listing in list or grid
//! form, and the current selection.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;

use super::{Component, ComponentContext};
use crate::browser::{BrowserStatus, RemoteTreeBrowser, TreeEntry, TreePath};
use crate::theme;
use crate::ui::{UiFrame, ellipsize};

pub const EMPTY_MESSAGE: &str = "No files or folders here yet.";
const LOADING_MESSAGE: &str = "Loading…";
const BACK_LABEL: &str = "[< Back]";
const LIST_LABEL: &str = "[List]";
const GRID_LABEL: &str = "[Grid]";
const TILE_WIDTH: u16 = 14;
const TILE_HEIGHT: u16 = 3;
const SIZE_COLUMN: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl ViewMode {
    fn toggled(self) -> Self {
        match self {
            ViewMode::List => ViewMode::Grid,
            ViewMode::Grid => ViewMode::List,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Back,
    Mode(ViewMode),
    Entry(usize),
}

#[derive(Debug)]
pub struct BrowserComponent {
    browser: RemoteTreeBrowser,
    mode: ViewMode,
    cursor: usize,
    /// First visible list row, or first visible grid row.
    scroll: usize,
    /// After going back, the folder we came out of gets the cursor.
    reveal: Option<TreePath>,
    /// Clickable regions from the last render, relative to the content origin.
    targets: Vec<(Rect, Target)>,
    grid_columns: usize,
}

impl BrowserComponent {
    pub fn new(browser: RemoteTreeBrowser) -> Self {
        Self {
            browser,
            mode: ViewMode::List,
            cursor: 0,
            scroll: 0,
            reveal: None,
            targets: Vec::new(),
            grid_columns: 1,
        }
    }

    pub fn browser(&self) -> &RemoteTreeBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut RemoteTreeBrowser {
        &mut self.browser
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            self.scroll = 0;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn entries(&self) -> &[TreeEntry] {
        &self.browser.state().entries
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.entries().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if delta.is_negative() {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            (self.cursor + delta as usize).min(len - 1)
        };
    }

    fn open_at(&mut self, index: usize) {
        let Some(entry) = self.entries().get(index).cloned() else {
            return;
        };
        self.cursor = index;
        if self.browser.open(&entry) {
            self.cursor = 0;
            self.scroll = 0;
            self.reveal = None;
        }
    }

    fn go_back(&mut self) {
        let from = self.browser.current_path().clone();
        if self.browser.back() {
            self.cursor = 0;
            self.scroll = 0;
            self.reveal = Some(from);
        }
    }

    fn refresh(&mut self) {
        self.browser.refresh();
    }

    fn activate(&mut self, target: Target) {
        match target {
            Target::Back => self.go_back(),
            Target::Mode(mode) => self.set_mode(mode),
            Target::Entry(index) => self.open_at(index),
        }
    }

    fn after_listing(&mut self) {
        let len = self.entries().len();
        if let Some(path) = self.reveal.take()
            && let Some(index) = self.entries().iter().position(|e| e.path == path)
        {
            self.cursor = index;
        }
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn keep_cursor_visible(&mut self, rows: usize, per_row: usize) {
        if rows == 0 {
            self.scroll = 0;
            return;
        }
        let row = self.cursor / per_row.max(1);
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + rows {
            self.scroll = row + 1 - rows;
        }
    }

    fn push_target(&mut self, area: Rect, rect: Rect, target: Target) {
        let clipped = rect.intersection(area);
        if clipped.width == 0 || clipped.height == 0 {
            return;
        }
        let local = Rect::new(clipped.x - area.x, clipped.y - area.y, clipped.width, clipped.height);
        self.targets.push((local, target));
    }

    fn render_toolbar(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        let y = area.y;
        let at_root = self.browser.current_path().is_root();
        let back_style = if at_root { theme::muted() } else { theme::button(false) };
        frame.set_string(area.x, y, BACK_LABEL, back_style);
        let back_width = BACK_LABEL.len() as u16;
        if !at_root {
            self.push_target(area, Rect::new(area.x, y, back_width, 1), Target::Back);
        }

        let toggles_width = (LIST_LABEL.len() + GRID_LABEL.len()) as u16;
        let toggles_x = area.right().saturating_sub(toggles_width);
        let path_x = area.x + back_width + 1;
        let path_room = toggles_x.saturating_sub(path_x + 1) as usize;
        let label = ellipsize(self.browser.current_path().label(), path_room);
        frame.set_string(path_x, y, &label, theme::header());

        if toggles_x > path_x {
            let grid_x = toggles_x + LIST_LABEL.len() as u16;
            frame.set_string(toggles_x, y, LIST_LABEL, theme::button(self.mode == ViewMode::List));
            frame.set_string(grid_x, y, GRID_LABEL, theme::button(self.mode == ViewMode::Grid));
            self.push_target(
                area,
                Rect::new(toggles_x, y, LIST_LABEL.len() as u16, 1),
                Target::Mode(ViewMode::List),
            );
            self.push_target(
                area,
                Rect::new(grid_x, y, GRID_LABEL.len() as u16, 1),
                Target::Mode(ViewMode::Grid),
            );
        }
    }

    fn render_list(&mut self, frame: &mut UiFrame<'_>, area: Rect, body: Rect, focused: bool) {
        let name_width = body.width.saturating_sub(SIZE_COLUMN + 1);
        frame.set_string(body.x, body.y, "Name", theme::header());
        frame.set_string(body.x + name_width + 1, body.y, "Size", theme::header());
        let rows = body.height.saturating_sub(1) as usize;
        self.keep_cursor_visible(rows, 1);

        let visible: Vec<(usize, TreeEntry)> = self
            .entries()
            .iter()
            .cloned()
            .enumerate()
            .skip(self.scroll)
            .take(rows)
            .collect();
        for (row, (index, entry)) in visible.into_iter().enumerate() {
            let y = body.y + 1 + row as u16;
            let line = Rect::new(body.x, y, body.width, 1);
            let selected = index == self.cursor;
            let style = if selected && focused {
                theme::highlight()
            } else {
                ratatui::style::Style::default()
            };
            frame.fill(line, " ", style);
            let glyph = if entry.is_folder() { "▸ " } else { "♪ " };
            let name = ellipsize(&entry.name, name_width.saturating_sub(2) as usize);
            frame.set_string(body.x, y, &format!("{glyph}{name}"), style);
            let size = entry.size_label().unwrap_or_else(|| "-".to_string());
            frame.set_string(body.x + name_width + 1, y, &size, style);
            self.push_target(area, line, Target::Entry(index));
        }
    }

    fn render_grid(&mut self, frame: &mut UiFrame<'_>, area: Rect, body: Rect, focused: bool) {
        let columns = (body.width / TILE_WIDTH).max(1) as usize;
        self.grid_columns = columns;
        let rows = (body.height / TILE_HEIGHT) as usize;
        self.keep_cursor_visible(rows, columns);

        let first = self.scroll * columns;
        let visible: Vec<(usize, TreeEntry)> = self
            .entries()
            .iter()
            .cloned()
            .enumerate()
            .skip(first)
            .take(rows * columns)
            .collect();
        for (slot, (index, entry)) in visible.into_iter().enumerate() {
            let x = body.x + (slot % columns) as u16 * TILE_WIDTH;
            let y = body.y + (slot / columns) as u16 * TILE_HEIGHT;
            let tile = Rect::new(x, y, TILE_WIDTH.saturating_sub(1), TILE_HEIGHT - 1);
            let style = if index == self.cursor && focused {
                theme::highlight()
            } else {
                ratatui::style::Style::default()
            };
            frame.fill(tile, " ", style);
            let glyph = if entry.is_folder() { "[dir]" } else { "[ ♪ ]" };
            frame.set_string(x + 1, y, glyph, style);
            let name = ellipsize(&entry.name, tile.width.saturating_sub(1) as usize);
            frame.set_string(x + 1, y + 1, &name, style);
            self.push_target(area, tile, Target::Entry(index));
        }
    }

    fn render_selection(&self, frame: &mut UiFrame<'_>, footer: Rect) {
        let Some(selection) = &self.browser.state().selection else {
            return;
        };
        let text = match &selection.url {
            Some(url) => format!("Selected: {}  {url}", selection.name),
            None => format!("Selected: {} (no preview)", selection.name),
        };
        let text = ellipsize(&text, footer.width as usize);
        frame.set_string(footer.x, footer.y, &text, theme::muted());
    }
}

impl Component for BrowserComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.targets.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.render_toolbar(frame, area);
        if area.height < 3 {
            return;
        }
        let has_footer = area.height >= 5;
        let footer_rows = u16::from(has_footer);
        let status_y = area.y + 1;
        let body = Rect::new(
            area.x,
            area.y + 2,
            area.width,
            area.height.saturating_sub(2 + footer_rows),
        );

        match self.browser.state().status() {
            BrowserStatus::Loading => {
                frame.set_string(area.x, status_y, LOADING_MESSAGE, theme::muted());
            }
            BrowserStatus::Failed => {
                let message = self.browser.state().error.clone().unwrap_or_default();
                let message = ellipsize(&message, area.width as usize);
                frame.set_string(area.x, status_y, &message, theme::error());
            }
            BrowserStatus::Empty => {
                frame.set_string(area.x, body.y, EMPTY_MESSAGE, theme::muted());
            }
            BrowserStatus::Ready => match self.mode {
                ViewMode::List => self.render_list(frame, area, body, ctx.focused()),
                ViewMode::Grid => self.render_grid(frame, area, body, ctx.focused()),
            },
        }

        if has_footer {
            let footer = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            self.render_selection(frame, footer);
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let step = match self.mode {
                    ViewMode::List => 1,
                    ViewMode::Grid => self.grid_columns.max(1) as isize,
                };
                match (key.code, self.mode) {
                    (KeyCode::Up | KeyCode::Char('k'), _) => self.move_cursor(-step),
                    (KeyCode::Down | KeyCode::Char('j'), _) => self.move_cursor(step),
                    (KeyCode::Left, ViewMode::Grid) => self.move_cursor(-1),
                    (KeyCode::Right, ViewMode::Grid) => self.move_cursor(1),
                    (KeyCode::PageUp, _) => self.move_cursor(-5 * step),
                    (KeyCode::PageDown, _) => self.move_cursor(5 * step),
                    (KeyCode::Home, _) => self.cursor = 0,
                    (KeyCode::End, _) => self.cursor = self.entries().len().saturating_sub(1),
                    (KeyCode::Enter, _) | (KeyCode::Right, ViewMode::List) => {
                        self.open_at(self.cursor)
                    }
                    (KeyCode::Backspace | KeyCode::Char('h'), _) | (KeyCode::Left, ViewMode::List) => {
                        self.go_back()
                    }
                    (KeyCode::Char('v'), _) => self.set_mode(self.mode.toggled()),
                    (KeyCode::Char('r'), _) => self.refresh(),
                    (KeyCode::Esc, _) => self.browser.clear_selection(),
                    _ => return false,
                }
                true
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    let hit = self.targets.iter().find_map(|(rect, target)| {
                        let inside = mouse.column >= rect.x
                            && mouse.column < rect.right()
                            && mouse.row >= rect.y
                            && mouse.row < rect.bottom();
                        inside.then_some(*target)
                    });
                    match hit {
                        Some(target) => {
                            self.activate(target);
                            true
                        }
                        None => false,
                    }
                }
                MouseEventKind::ScrollUp => {
                    self.move_cursor(-1);
                    true
                }
                MouseEventKind::ScrollDown => {
                    self.move_cursor(1);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn tick(&mut self, now: Instant) {
        if self.browser.poll_at(now) {
            self.after_listing();
        }
    }
}
