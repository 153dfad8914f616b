//! Pointer drag and resize sessions for floating windows.
//!
//! A window is either idle, being dragged by its title bar, or being resized
//! by its grip. Sessions exist only between pointer-down and pointer-up and
//! are never persisted.

use crate::geometry::{Point, Size, SizeLimits, WindowGeometry};

/// Title-bar drag: remembers where inside the window the pointer grabbed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    offset: Point,
}

impl DragSession {
    pub fn begin(pointer: Point, origin: Point) -> Self {
        Self {
            offset: pointer - origin,
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// New window origin for `pointer`. Not clamped to the viewport.
    pub fn position_for(&self, pointer: Point) -> Point {
        pointer - self.offset
    }
}

/// Grip resize anchored on the window's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSession {
    start_size: Size,
    start_pointer: Point,
}

impl ResizeSession {
    pub fn begin(pointer: Point, size: Size) -> Self {
        Self {
            start_size: size,
            start_pointer: pointer,
        }
    }

    pub fn size_for(&self, pointer: Point, limits: SizeLimits) -> Size {
        let delta = pointer - self.start_pointer;
        limits.clamp(Size::new(
            self.start_size.width.saturating_add(delta.x),
            self.start_size.height.saturating_add(delta.y),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerSession {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

/// Geometry update produced by a pointer move inside an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryChange {
    Moved(Point),
    Resized(Size),
}

impl GeometryChange {
    pub fn apply(self, geometry: WindowGeometry) -> WindowGeometry {
        match self {
            GeometryChange::Moved(position) => WindowGeometry {
                position,
                size: geometry.size,
            },
            GeometryChange::Resized(size) => WindowGeometry {
                position: geometry.position,
                size,
            },
        }
    }
}

/// Drag/resize state machine for one window.
///
/// `Idle -> Dragging -> Idle` and `Idle -> Resizing -> Idle`. Starting a
/// session while another one is active is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionController {
    session: PointerSession,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> PointerSession {
        self.session
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.session, PointerSession::Idle)
    }

    pub fn begin_drag(&mut self, pointer: Point, geometry: &WindowGeometry) -> bool {
        if self.is_active() {
            return false;
        }
        self.session = PointerSession::Dragging(DragSession::begin(pointer, geometry.position));
        true
    }

    pub fn begin_resize(&mut self, pointer: Point, geometry: &WindowGeometry) -> bool {
        if self.is_active() {
            return false;
        }
        self.session = PointerSession::Resizing(ResizeSession::begin(pointer, geometry.size));
        true
    }

    pub fn pointer_moved(&self, pointer: Point, limits: SizeLimits) -> Option<GeometryChange> {
        match self.session {
            PointerSession::Idle => None,
            PointerSession::Dragging(drag) => Some(GeometryChange::Moved(drag.position_for(pointer))),
            PointerSession::Resizing(resize) => {
                Some(GeometryChange::Resized(resize.size_for(pointer, limits)))
            }
        }
    }

    /// Ends whatever session is active. Returns whether one was active.
    pub fn release(&mut self) -> bool {
        let was_active = self.is_active();
        self.session = PointerSession::Idle;
        was_active
    }
}
