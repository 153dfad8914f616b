use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::decorator::{FrameHit, StudioDecorator, WindowDecorator};
use super::{MountOutcome, WindowFrame, WindowKey, WindowSpec};
use crate::geometry::{GeometryDefaults, GeometryStore, Point, Size, SizeLimits, WindowGeometry};
use crate::ui::UiFrame;

/// Owns the open windows, their stacking order and the pointer capture.
///
/// Windows are kept back-to-front: the last one is on top and has keyboard
/// focus. While a drag or resize is active every mouse event is routed to
/// the window that started it, wherever the pointer is.
pub struct WindowManager {
    windows: Vec<WindowFrame>,
    capture: Option<WindowKey>,
    store: GeometryStore,
    viewport: Size,
    defaults: GeometryDefaults,
    limits: SizeLimits,
    decorator: Arc<dyn WindowDecorator>,
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("windows", &self.windows)
            .field("capture", &self.capture)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    pub fn new(store: GeometryStore, viewport: Size) -> Self {
        Self {
            windows: Vec::new(),
            capture: None,
            store,
            viewport,
            defaults: GeometryDefaults::CELLS,
            limits: SizeLimits::CELLS,
            decorator: Arc::new(StudioDecorator),
        }
    }

    pub fn with_defaults(mut self, defaults: GeometryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_limits(mut self, limits: SizeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Windows are not moved when the viewport shrinks; off-screen windows
    /// stay reachable by their title bar or by reopening.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Keys in stacking order, bottom first.
    pub fn keys(&self) -> Vec<WindowKey> {
        self.windows.iter().map(|w| w.key().clone()).collect()
    }

    pub fn focused_key(&self) -> Option<&WindowKey> {
        self.windows.last().map(|w| w.key())
    }

    pub fn is_open(&self, key: &WindowKey) -> bool {
        self.index_of(key).is_some()
    }

    pub fn capture(&self) -> Option<&WindowKey> {
        self.capture.as_ref()
    }

    pub fn geometry(&self, key: &WindowKey) -> Option<WindowGeometry> {
        self.frame(key).map(|w| w.geometry())
    }

    pub fn frame(&self, key: &WindowKey) -> Option<&WindowFrame> {
        self.windows.iter().find(|w| w.key() == key)
    }

    pub fn frame_mut(&mut self, key: &WindowKey) -> Option<&mut WindowFrame> {
        self.windows.iter_mut().find(|w| w.key() == key)
    }

    fn index_of(&self, key: &WindowKey) -> Option<usize> {
        self.windows.iter().position(|w| w.key() == key)
    }

    /// Mounts a window on top. A key that is already open is raised instead
    /// and the new `WindowSpec` is dropped.
    pub fn open(&mut self, spec: WindowSpec) -> MountOutcome {
        if self.bring_to_front(&spec.key) {
            tracing::debug!(window = %spec.key, "window already open, raised");
            return MountOutcome::AlreadyOpen;
        }
        let frame = WindowFrame::mount(
            spec,
            self.store.clone(),
            self.viewport,
            self.defaults,
            self.limits,
        );
        tracing::info!(window = %frame.key(), geometry = ?frame.geometry(), "window mounted");
        self.windows.push(frame);
        MountOutcome::Mounted
    }

    /// Unmounts a window, ending any pointer session it owns and running its
    /// close hook.
    pub fn close(&mut self, key: &WindowKey) -> bool {
        let Some(index) = self.index_of(key) else {
            return false;
        };
        if self.capture.as_ref() == Some(key) {
            self.release_capture();
        }
        let frame = self.windows.remove(index);
        tracing::info!(window = %key, "window closed");
        frame.close();
        true
    }

    pub fn close_focused(&mut self) -> bool {
        match self.focused_key().cloned() {
            Some(key) => self.close(&key),
            None => false,
        }
    }

    pub fn bring_to_front(&mut self, key: &WindowKey) -> bool {
        let Some(index) = self.index_of(key) else {
            return false;
        };
        self.raise(index);
        true
    }

    fn raise(&mut self, index: usize) {
        if index + 1 < self.windows.len() {
            let frame = self.windows.remove(index);
            self.windows.push(frame);
        }
    }

    /// Topmost window whose bounds contain `point`.
    fn window_at(&self, point: Point) -> Option<usize> {
        self.windows
            .iter()
            .rposition(|w| w.geometry().contains(point))
    }

    /// The only place a pointer session ends.
    fn release_capture(&mut self) -> bool {
        let Some(key) = self.capture.take() else {
            return false;
        };
        if let Some(frame) = self.frame_mut(&key) {
            frame.end_session();
        }
        tracing::debug!(window = %key, "pointer capture released");
        true
    }

    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Key(key)
                if key.kind == KeyEventKind::Press
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('w') | KeyCode::Char('W')) =>
            {
                self.close_focused()
            }
            Event::Key(_) | Event::Paste(_) => match self.windows.last_mut() {
                Some(top) => top.dispatch_to_content(event, true),
                None => false,
            },
            Event::Resize(width, height) => {
                self.set_viewport(Size::new(*width as i32, *height as i32));
                false
            }
            _ => false,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        let point = Point::new(mouse.column as i32, mouse.row as i32);
        if let Some(key) = self.capture.clone() {
            match mouse.kind {
                MouseEventKind::Drag(_) => {
                    if let Some(frame) = self.frame_mut(&key) {
                        frame.pointer_moved(point);
                    }
                    return true;
                }
                MouseEventKind::Up(_) => {
                    self.release_capture();
                    return true;
                }
                // Bare motion or a press while captured means the release
                // was lost.
                _ => {
                    self.release_capture();
                }
            }
        }

        let Some(index) = self.window_at(point) else {
            return false;
        };
        let decorator = Arc::clone(&self.decorator);
        if let MouseEventKind::Down(button) = mouse.kind {
            self.raise(index);
            let top = self.windows.len() - 1;
            let key = self.windows[top].key().clone();
            let hit = self.windows[top].hit_test(decorator.as_ref(), point);
            match (hit, button) {
                (FrameHit::Close, MouseButton::Left) => {
                    self.close(&key);
                }
                (FrameHit::TitleBar, MouseButton::Left) => {
                    if self.windows[top].begin_drag(point) {
                        self.capture = Some(key);
                    }
                }
                (FrameHit::ResizeGrip, MouseButton::Left) => {
                    if self.windows[top].begin_resize(point) {
                        self.capture = Some(key);
                    }
                }
                (FrameHit::Content, _) => {
                    let local = localize(mouse, self.windows[top].content_origin(decorator.as_ref()));
                    self.windows[top].dispatch_to_content(&local, true);
                }
                _ => {}
            }
            return true;
        }

        let focused = index + 1 == self.windows.len();
        let frame = &mut self.windows[index];
        if frame.hit_test(decorator.as_ref(), point) == FrameHit::Content {
            let local = localize(mouse, frame.content_origin(decorator.as_ref()));
            frame.dispatch_to_content(&local, focused);
        }
        true
    }

    pub fn tick(&mut self, now: Instant) {
        for frame in &mut self.windows {
            frame.tick(now);
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let top = self.windows.len().saturating_sub(1);
        let decorator = Arc::clone(&self.decorator);
        for (index, window) in self.windows.iter_mut().enumerate() {
            window.render(frame, decorator.as_ref(), index == top);
        }
    }
}

/// Rebases a screen-space mouse event onto a content origin.
fn localize(mouse: &MouseEvent, origin: Point) -> Event {
    let column = (mouse.column as i32 - origin.x).clamp(0, u16::MAX as i32) as u16;
    let row = (mouse.row as i32 - origin.y).clamp(0, u16::MAX as i32) as u16;
    Event::Mouse(MouseEvent {
        kind: mouse.kind,
        column,
        row,
        modifiers: mouse.modifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, ComponentContext};
    use crossterm::event::KeyEvent;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl Component for Recorder {
        fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
            frame.fill(area, "~", ratatui::style::Style::default());
        }

        fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
            self.events.borrow_mut().push(event.clone());
            true
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn manager_with(store: &GeometryStore, windows: &[(&str, WindowGeometry)]) -> WindowManager {
        let mut wm = WindowManager::new(store.clone(), Size::new(100, 40));
        for (key, geometry) in windows {
            store.save(key, *geometry);
            wm.open(WindowSpec::new(*key, key.to_uppercase(), Box::new(Recorder::default())));
        }
        wm
    }

    fn key(name: &str) -> WindowKey {
        WindowKey::new(name)
    }

    #[test]
    fn duplicate_open_raises_existing_window() {
        let store = GeometryStore::in_memory();
        let mut wm = manager_with(
            &store,
            &[
                ("audio", WindowGeometry::new(0, 0, 30, 10)),
                ("log", WindowGeometry::new(40, 0, 30, 10)),
            ],
        );
        assert_eq!(wm.focused_key(), Some(&key("log")));
        let outcome = wm.open(WindowSpec::new("audio", "AUDIO", Box::new(Recorder::default())));
        assert_eq!(outcome, MountOutcome::AlreadyOpen);
        assert_eq!(wm.len(), 2);
        assert_eq!(wm.keys(), vec![key("log"), key("audio")]);
    }

    #[test]
    fn click_raises_window_under_pointer() {
        let store = GeometryStore::in_memory();
        let mut wm = manager_with(
            &store,
            &[
                ("a", WindowGeometry::new(0, 0, 30, 10)),
                ("b", WindowGeometry::new(10, 5, 30, 10)),
            ],
        );
        // (2, 2) is only covered by "a".
        assert!(wm.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 2)));
        assert_eq!(wm.focused_key(), Some(&key("a")));
        // Overlap goes to the topmost window, which is now "a".
        wm.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 2, 2));
        wm.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 7));
        assert_eq!(wm.focused_key(), Some(&key("a")));
        assert!(!wm.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 90, 35)));
    }

    #[test]
    fn title_drag_moves_and_persists_until_release() {
        let store = GeometryStore::in_memory();
        let mut wm = manager_with(&store, &[("calendar", WindowGeometry::new(10, 5, 30, 10))]);
        wm.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 15, 5));
        assert_eq!(wm.capture(), Some(&key("calendar")));
        // The pointer leaving the window does not end the drag.
        wm.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 3, 0));
        assert_eq!(wm.geometry(&key("calendar")), Some(WindowGeometry::new(-2, 0, 30, 10)));
        assert_eq!(store.load("calendar"), Some(WindowGeometry::new(-2, 0, 30, 10)));
        wm.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 3, 0));
        assert_eq!(wm.capture(), None);
        wm.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 50, 20));
        assert_eq!(wm.geometry(&key("calendar")), Some(WindowGeometry::new(-2, 0, 30, 10)));
    }

    #[test]
    fn bare_motion_after_lost_release_ends_the_drag() {
        let store = GeometryStore::in_memory();
        let mut wm = manager_with(&store, &[("calendar", WindowGeometry::new(10, 5, 30, 10))]);
        wm.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 15, 5));
        wm.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 20, 8));
        assert_eq!(wm.geometry(&key("calendar")), Some(WindowGeometry::new(15, 8, 30, 10)));
        wm.handle_event(&mouse(MouseEventKind::Moved, 60, 30));
        assert_eq!(wm.capture(), None);
        assert_eq!(wm.geometry(&key("calendar")), Some(WindowGeometry::new(15, 8, 30, 10)));
        assert_eq!(store.load("calendar"), Some(WindowGeometry::new(15, 8, 30, 10)));
    }

    #[test]
    fn grip_resize_clamps_to_minimum() {
        let store = GeometryStore::in_memory();
        let mut wm = manager_with(&store, &[("w", WindowGeometry::new(0, 0, 30, 10))]);
        wm.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 29, 9));
        wm.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0));
        assert_eq!(wm.geometry(&key("w")), Some(WindowGeometry::new(0, 0, 24, 8)));
        wm.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 40, 14));
        assert_eq!(wm.geometry(&key("w")), Some(WindowGeometry::new(0, 0, 41, 15)));
        wm.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 40, 14));
        assert_eq!(store.load("w"), Some(WindowGeometry::new(0, 0, 41, 15)));
    }

    #[test]
    fn closing_during_drag_releases_capture() {
        let store = GeometryStore::in_memory();
        let mut wm = manager_with(
            &store,
            &[
                ("a", WindowGeometry::new(0, 0, 30, 10)),
                ("b", WindowGeometry::new(40, 0, 30, 10)),
            ],
        );
        wm.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 45, 0));
        assert_eq!(wm.capture(), Some(&key("b")));
        assert!(wm.close(&key("b")));
        assert_eq!(wm.capture(), None);
        // Later moves reach nobody.
        assert!(!wm.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 60, 30)));
        assert_eq!(wm.geometry(&key("a")), Some(WindowGeometry::new(0, 0, 30, 10)));
    }

    #[test]
    fn close_control_and_ctrl_w_unmount() {
        let store = GeometryStore::in_memory();
        let mut wm = manager_with(
            &store,
            &[
                ("a", WindowGeometry::new(0, 0, 30, 10)),
                ("b", WindowGeometry::new(40, 0, 30, 10)),
            ],
        );
        // [x] on "a" sits at columns 26..29 of its title bar.
        wm.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 27, 0));
        assert_eq!(wm.keys(), vec![key("b")]);
        let ctrl_w = Event::Key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        assert!(wm.handle_event(&ctrl_w));
        assert!(wm.is_empty());
        assert!(!wm.handle_event(&ctrl_w));
    }

    #[test]
    fn content_events_are_localized_and_keys_go_to_top() {
        let store = GeometryStore::in_memory();
        let mut wm = WindowManager::new(store.clone(), Size::new(100, 40));
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));
        store.save("a", WindowGeometry::new(10, 5, 30, 10));
        store.save("b", WindowGeometry::new(50, 5, 30, 10));
        wm.open(WindowSpec::new("a", "A", Box::new(Recorder { events: seen_a.clone() })));
        wm.open(WindowSpec::new("b", "B", Box::new(Recorder { events: seen_b.clone() })));

        wm.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 14, 8));
        let Event::Mouse(local) = seen_a.borrow()[0].clone() else {
            panic!("expected mouse event");
        };
        assert_eq!((local.column, local.row), (3, 2));

        let key_a = Event::Key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        wm.handle_event(&key_a);
        assert_eq!(seen_a.borrow().len(), 2);
        assert!(seen_b.borrow().is_empty());
    }

    #[test]
    fn render_composites_windows_bottom_to_top() {
        let store = GeometryStore::in_memory();
        let mut wm = manager_with(
            &store,
            &[
                ("a", WindowGeometry::new(-5, 0, 30, 10)),
                ("b", WindowGeometry::new(10, 3, 30, 10)),
            ],
        );
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        wm.render(&mut frame);
        // "b" is on top, so its title bar covers "a"'s content at row 3.
        let row: String = (10..40).map(|x| buf.cell((x, 3)).unwrap().symbol().to_string()).collect();
        assert!(row.contains('B'));
        assert_eq!(buf.cell((1, 1)).unwrap().symbol(), "~");
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), " ");
    }
}
