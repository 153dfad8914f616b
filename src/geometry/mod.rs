//! Window geometry: positions, sizes, size limits and default placement.
//!
//! Geometry is unit-agnostic. The reference layout is pixel based (see
//! [`SizeLimits::REFERENCE`]); the terminal desktop uses one unit per cell.

pub mod kv;
pub mod store;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::constants::{
    CELL_DEFAULT_HEIGHT, CELL_DEFAULT_WIDTH, CELL_MIN_HEIGHT, CELL_MIN_WIDTH,
    REFERENCE_DEFAULT_HEIGHT, REFERENCE_DEFAULT_WIDTH, REFERENCE_MIN_HEIGHT, REFERENCE_MIN_WIDTH,
};

pub use kv::{FileKv, KeyValueStore, KvError, MemoryKv};
pub use store::GeometryStore;

/// A signed point. Window origins may be negative: windows are allowed to be
/// dragged partially off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Lower bound applied to every window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub min_width: i32,
    pub min_height: i32,
}

impl SizeLimits {
    /// 260x220, the pixel minimum that keeps a window's controls reachable.
    pub const REFERENCE: SizeLimits = SizeLimits::new(REFERENCE_MIN_WIDTH, REFERENCE_MIN_HEIGHT);

    /// Minimum for windows drawn in terminal cells.
    pub const CELLS: SizeLimits = SizeLimits::new(CELL_MIN_WIDTH, CELL_MIN_HEIGHT);

    pub const fn new(min_width: i32, min_height: i32) -> Self {
        Self {
            min_width,
            min_height,
        }
    }

    pub fn clamp(&self, size: Size) -> Size {
        Size {
            width: size.width.max(self.min_width),
            height: size.height.max(self.min_height),
        }
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// Where a window lands when no stored geometry exists for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Anchored to the bottom-left corner, inset by the margin on both axes.
    #[default]
    BottomLeft,
    Centered,
}

/// Everything needed to compute a window's first geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryDefaults {
    pub size: Size,
    pub margin: i32,
    pub placement: Placement,
}

impl GeometryDefaults {
    pub const REFERENCE: GeometryDefaults = GeometryDefaults {
        size: Size::new(REFERENCE_DEFAULT_WIDTH, REFERENCE_DEFAULT_HEIGHT),
        margin: crate::constants::REFERENCE_MARGIN,
        placement: Placement::BottomLeft,
    };

    pub const CELLS: GeometryDefaults = GeometryDefaults {
        size: Size::new(CELL_DEFAULT_WIDTH, CELL_DEFAULT_HEIGHT),
        margin: crate::constants::CELL_MARGIN,
        placement: Placement::BottomLeft,
    };

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }
}

/// Position and size of one window. The window's identity is the key it is
/// stored under, not part of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct WindowGeometry {
    pub position: Point,
    pub size: Size,
}

impl WindowGeometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            position: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Computes the first geometry of a window inside `viewport`.
    ///
    /// The bottom-left placement reproduces the reference layout: a 360x380
    /// window in a viewport of height `h` opens at `(40, h - 420)`.
    pub fn default_in(viewport: Size, defaults: GeometryDefaults, limits: SizeLimits) -> Self {
        let size = limits.clamp(defaults.size);
        let position = match defaults.placement {
            Placement::BottomLeft => Point::new(
                defaults.margin,
                viewport.height - size.height - defaults.margin,
            ),
            Placement::Centered => Point::new(
                (viewport.width - size.width) / 2,
                (viewport.height - size.height) / 2,
            ),
        };
        Self { position, size }
    }

    pub fn with_limits(self, limits: SizeLimits) -> Self {
        Self {
            position: self.position,
            size: limits.clamp(self.size),
        }
    }

    pub fn right(&self) -> i32 {
        self.position.x.saturating_add(self.size.width)
    }

    pub fn bottom(&self) -> i32 {
        self.position.y.saturating_add(self.size.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.x < self.right()
            && point.y >= self.position.y
            && point.y < self.bottom()
    }
}

/// Flat persisted form: `{"x":..,"y":..,"width":..,"height":..}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct StoredGeometry {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl From<WindowGeometry> for StoredGeometry {
    fn from(geometry: WindowGeometry) -> Self {
        Self {
            x: geometry.position.x,
            y: geometry.position.y,
            width: geometry.size.width,
            height: geometry.size.height,
        }
    }
}

impl From<StoredGeometry> for WindowGeometry {
    fn from(stored: StoredGeometry) -> Self {
        WindowGeometry::new(stored.x, stored.y, stored.width, stored.height)
    }
}
