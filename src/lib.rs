//! Studio desk: a terminal desktop that hosts floating, persistent windows.
//!
//! The core pieces are the window geometry store, the pointer drag/resize
//! controller, the window manager and the remote tree browser that walks an
//! object store one folder at a time.

pub mod browser;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod geometry;
pub mod interaction;
pub mod log_buffer;
pub mod runner;
pub mod shell;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
