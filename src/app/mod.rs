//! Outer collaborators: the frame loop and the command-driven UI adapter.

pub mod controller;
pub mod viewport;

pub use controller::{UiCommand, UiController};
pub use viewport::{FrameState, Viewport};
