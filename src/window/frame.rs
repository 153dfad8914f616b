use std::time::Instant;

use crossterm::event::Event;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::decorator::{FrameHit, WindowDecorator};
use super::{CloseHook, WindowKey, WindowSpec};
use crate::components::{Component, ComponentContext};
use crate::geometry::{
    GeometryDefaults, GeometryStore, Point, Size, SizeLimits, WindowGeometry,
};
use crate::interaction::{InteractionController, PointerSession};
use crate::ui::UiFrame;

/// One floating panel: geometry, chrome affordances and a content slot.
///
/// Geometry is written through to the [`GeometryStore`] on every change,
/// keyed by the window's [`WindowKey`], never by its title.
pub struct WindowFrame {
    key: WindowKey,
    title: String,
    geometry: WindowGeometry,
    limits: SizeLimits,
    content: Box<dyn Component>,
    on_close: Option<CloseHook>,
    interaction: InteractionController,
    store: GeometryStore,
}

impl std::fmt::Debug for WindowFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowFrame")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("geometry", &self.geometry)
            .field("session", &self.interaction.session())
            .finish_non_exhaustive()
    }
}

impl WindowFrame {
    /// Mounts a window: restores its stored geometry or computes a default.
    pub fn mount(
        spec: WindowSpec,
        store: GeometryStore,
        viewport: Size,
        defaults: GeometryDefaults,
        limits: SizeLimits,
    ) -> Self {
        let WindowSpec {
            key,
            title,
            content,
            on_close,
            default_size,
        } = spec;
        let defaults = match default_size {
            Some(size) => defaults.with_size(size),
            None => defaults,
        };
        let geometry = match store.load(key.as_str()) {
            Some(stored) => stored.with_limits(limits),
            None => {
                tracing::debug!(window = %key, "no stored geometry, using default");
                WindowGeometry::default_in(viewport, defaults, limits)
            }
        };
        Self {
            key,
            title,
            geometry,
            limits,
            content,
            on_close,
            interaction: InteractionController::new(),
            store,
        }
    }

    pub fn key(&self) -> &WindowKey {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    pub fn session(&self) -> PointerSession {
        self.interaction.session()
    }

    fn set_geometry(&mut self, geometry: WindowGeometry) -> bool {
        let geometry = geometry.with_limits(self.limits);
        if geometry == self.geometry {
            return false;
        }
        self.geometry = geometry;
        self.store.save(self.key.as_str(), geometry);
        true
    }

    pub fn move_to(&mut self, position: Point) -> bool {
        self.set_geometry(WindowGeometry {
            position,
            size: self.geometry.size,
        })
    }

    pub fn resize_to(&mut self, size: Size) -> bool {
        self.set_geometry(WindowGeometry {
            position: self.geometry.position,
            size,
        })
    }

    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        self.interaction.begin_drag(pointer, &self.geometry)
    }

    pub fn begin_resize(&mut self, pointer: Point) -> bool {
        self.interaction.begin_resize(pointer, &self.geometry)
    }

    /// Feeds a pointer move into the active session. Returns whether the
    /// geometry changed.
    pub fn pointer_moved(&mut self, pointer: Point) -> bool {
        match self.interaction.pointer_moved(pointer, self.limits) {
            Some(change) => {
                let next = change.apply(self.geometry);
                self.set_geometry(next)
            }
            None => false,
        }
    }

    pub fn end_session(&mut self) -> bool {
        self.interaction.release()
    }

    fn frame_size(&self) -> (u16, u16) {
        (
            self.geometry.size.width.clamp(1, u16::MAX as i32) as u16,
            self.geometry.size.height.clamp(1, u16::MAX as i32) as u16,
        )
    }

    fn local(&self, point: Point) -> Point {
        point - self.geometry.position
    }

    pub fn hit_test(&self, decorator: &dyn WindowDecorator, point: Point) -> FrameHit {
        let (w, h) = self.frame_size();
        decorator.hit_test(w, h, self.local(point))
    }

    /// Screen-space rectangle of the content slot.
    pub fn content_origin(&self, decorator: &dyn WindowDecorator) -> Point {
        let (w, h) = self.frame_size();
        let content = decorator.content_rect(w, h);
        self.geometry.position + Point::new(content.x as i32, content.y as i32)
    }

    /// Forwards an event to the hosted content. Mouse events must already be
    /// localized to the content area.
    pub fn dispatch_to_content(&mut self, event: &Event, focused: bool) -> bool {
        self.content
            .handle_event(event, &ComponentContext::new(focused))
    }

    pub fn tick(&mut self, now: Instant) {
        self.content.tick(now);
    }

    /// Renders chrome and content offscreen, then composites at the window's
    /// signed origin.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, decorator: &dyn WindowDecorator, focused: bool) {
        let (w, h) = self.frame_size();
        let local_area = Rect::new(0, 0, w, h);
        let mut offscreen = Buffer::empty(local_area);
        {
            let mut local = UiFrame::from_parts(local_area, &mut offscreen);
            decorator.render(&mut local, w, h, &self.title, focused);
            let content_area = decorator.content_rect(w, h);
            if content_area.width > 0 && content_area.height > 0 {
                let ctx = ComponentContext::new(focused);
                let content = &mut self.content;
                local.with_clip(content_area, |inner| {
                    content.render(inner, content_area, &ctx);
                });
            }
        }
        let dest = WindowGeometry::new(
            self.geometry.position.x,
            self.geometry.position.y,
            w as i32,
            h as i32,
        );
        frame.blit_signed(&offscreen, dest);
    }

    /// Consumes the frame, running its close hook.
    pub fn close(mut self) {
        self.interaction.release();
        if let Some(mut hook) = self.on_close.take() {
            hook(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MemoryKv;
    use crate::window::decorator::StudioDecorator;
    use std::sync::Arc;

    struct Blank;
    impl Component for Blank {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }

    fn mount_with(store: GeometryStore, key: &str) -> WindowFrame {
        WindowFrame::mount(
            WindowSpec::new(key, key, Box::new(Blank)),
            store,
            Size::new(1280, 800),
            GeometryDefaults::REFERENCE,
            SizeLimits::REFERENCE,
        )
    }

    #[test]
    fn first_mount_uses_default_geometry() {
        let frame = mount_with(GeometryStore::in_memory(), "calendar");
        assert_eq!(frame.geometry(), WindowGeometry::new(40, 380, 360, 380));
    }

    #[test]
    fn drag_persists_every_move() {
        let store = GeometryStore::in_memory();
        let mut frame = mount_with(store.clone(), "calendar");
        assert!(frame.begin_drag(Point::new(50, 385)));
        assert!(frame.pointer_moved(Point::new(60, 395)));
        assert_eq!(store.load("calendar"), Some(WindowGeometry::new(50, 390, 360, 380)));
        assert!(frame.pointer_moved(Point::new(10, 5)));
        assert_eq!(store.load("calendar"), Some(WindowGeometry::new(0, 0, 360, 380)));
        assert!(frame.end_session());
        assert!(!frame.pointer_moved(Point::new(500, 500)));
    }

    #[test]
    fn stored_geometry_is_clamped_on_mount() {
        let store = GeometryStore::in_memory();
        store.save("tiny", WindowGeometry::new(5, 6, 10, 10));
        let frame = mount_with(store, "tiny");
        assert_eq!(frame.geometry(), WindowGeometry::new(5, 6, 260, 220));
    }

    #[test]
    fn malformed_store_falls_back_to_default() {
        let kv = Arc::new(MemoryKv::new());
        crate::geometry::KeyValueStore::set(kv.as_ref(), "window:calendar:geometry", "}{".into())
            .unwrap();
        let frame = mount_with(GeometryStore::new(kv), "calendar");
        assert_eq!(frame.geometry(), WindowGeometry::new(40, 380, 360, 380));
    }

    #[test]
    fn close_runs_hook_with_key() {
        let closed = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = closed.clone();
        let spec = WindowSpec::new("audio", "AUDIO", Box::new(Blank)).on_close(move |key| {
            sink.lock().unwrap().push(key.to_string());
        });
        let frame = WindowFrame::mount(
            spec,
            GeometryStore::in_memory(),
            Size::new(100, 40),
            GeometryDefaults::CELLS,
            SizeLimits::CELLS,
        );
        frame.close();
        assert_eq!(closed.lock().unwrap().as_slice(), ["audio"]);
    }

    #[test]
    fn hit_test_uses_window_origin() {
        let store = GeometryStore::in_memory();
        store.save("w", WindowGeometry::new(10, 5, 30, 10));
        let frame = WindowFrame::mount(
            WindowSpec::new("w", "W", Box::new(Blank)),
            store,
            Size::new(100, 40),
            GeometryDefaults::CELLS,
            SizeLimits::CELLS,
        );
        let d = StudioDecorator;
        assert_eq!(frame.hit_test(&d, Point::new(15, 5)), FrameHit::TitleBar);
        assert_eq!(frame.hit_test(&d, Point::new(39, 14)), FrameHit::ResizeGrip);
        assert_eq!(frame.hit_test(&d, Point::new(12, 8)), FrameHit::Content);
        assert_eq!(frame.content_origin(&d), Point::new(11, 6));
    }
}
