//! Utility Module
//!
//! - [`OrbitControls`]: orbit camera controller
//! - [`CameraMover`]: eased, scripted camera moves
//! - [`Timer`]: frame delta and elapsed time

pub mod camera_move;
pub mod orbit_control;
pub mod time;

pub use camera_move::{CameraMover, ease_in_out_quad};
pub use orbit_control::OrbitControls;
pub use time::Timer;
