//! Motion controller and the mode/size coordinator that drives it.
//!
//! Nothing in here touches GTK: the window is reached through [`Geometry`] and the
//! repeating timer through [`Scheduler`], so the whole behaviour runs against fakes in
//! tests.

pub mod coordinator;
pub mod geometry;
pub mod motion;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::Coordinator;
pub use geometry::{Geometry, Size};
pub use motion::{FlyState, FollowState, Motion, Velocity};
pub use scheduler::{Scheduler, TickFn};

use petctl::wm::Point;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PetError {
    #[error("size scale must be a positive number, got {0}")]
    InvalidScale(f64),
}

/// Rounds to the nearest integer, ties towards positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

pub fn round_point(point: Point) -> Point {
    Point::new(round_half_up(point.x), round_half_up(point.y))
}
