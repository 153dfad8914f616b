//! Floating windows: chrome, geometry, z-order and the mount contract hosts
//! use to open them.

pub mod decorator;
mod frame;
mod manager;

use std::fmt;

use crate::components::Component;
use crate::geometry::Size;

pub use decorator::{FrameHit, StudioDecorator, WindowDecorator};
pub use frame::WindowFrame;
pub use manager::WindowManager;

/// Stable identity of a window. Used as the geometry persistence key and for
/// duplicate detection; independent of the title shown in the chrome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowKey(String);

impl WindowKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for WindowKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

pub type CloseHook = Box<dyn FnMut(&WindowKey)>;

/// What a host supplies to open a window.
pub struct WindowSpec {
    pub key: WindowKey,
    pub title: String,
    pub content: Box<dyn Component>,
    pub on_close: Option<CloseHook>,
    /// Overrides the desk-wide default size for a first mount.
    pub default_size: Option<Size>,
}

impl WindowSpec {
    pub fn new(
        key: impl Into<WindowKey>,
        title: impl Into<String>,
        content: Box<dyn Component>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            content,
            on_close: None,
            default_size: None,
        }
    }

    pub fn on_close(mut self, hook: impl FnMut(&WindowKey) + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    pub fn default_size(mut self, size: Size) -> Self {
        self.default_size = Some(size);
        self
    }
}

impl fmt::Debug for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowSpec")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("default_size", &self.default_size)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    /// A window with the same key was already open and was raised instead.
    AlreadyOpen,
}
