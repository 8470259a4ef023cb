//! Host capability interfaces and their terminal implementations.

pub mod fullscreen;

pub use fullscreen::{FullscreenCapability, TerminalFullscreen};
