//! Terminal UI for XDchat
//!
//! A thin shell over [`xdchat_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`xdchat_app::Runtime`].
//!
//! This crate only handles key translation and rendering.

#![forbid(unsafe_code)]

pub mod terminal;
pub mod ui;

pub use terminal::{TerminalDriver, TerminalError};
