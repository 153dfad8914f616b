//! Shared crate-wide constants.

use std::time::Duration;

/// Minimum window width in the pixel-based reference layout.
pub const REFERENCE_MIN_WIDTH: i32 = 260;

/// Minimum window height in the pixel-based reference layout.
pub const REFERENCE_MIN_HEIGHT: i32 = 220;

/// Default window size in the pixel-based reference layout.
pub const REFERENCE_DEFAULT_WIDTH: i32 = 360;
pub const REFERENCE_DEFAULT_HEIGHT: i32 = 380;

/// Distance from the viewport edges used by the bottom-left default placement.
pub const REFERENCE_MARGIN: i32 = 40;

/// Terminal defaults. One geometry unit is one cell, so the window must stay
/// large enough for the title bar, the close control and a few content rows.
pub const CELL_MIN_WIDTH: i32 = 24;
pub const CELL_MIN_HEIGHT: i32 = 8;
pub const CELL_DEFAULT_WIDTH: i32 = 48;
pub const CELL_DEFAULT_HEIGHT: i32 = 16;
pub const CELL_MARGIN: i32 = 2;

/// Upper bound on a single remote listing before the browser gives up on it.
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(10);

/// Matches the page size the object store is asked for.
pub const LISTING_LIMIT: usize = 2000;

/// Folders kept by the listing cache before the least recently used is evicted.
pub const LISTING_CACHE_CAPACITY: usize = 64;

/// Number of lines retained by the in-memory activity log.
pub const DEFAULT_LOG_LINES: usize = 2000;

/// Poll interval of the UI loop.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
