use super::round_half_up;
use petctl::wm::Point;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Multiplies both sides and rounds to whole pixels.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(
            round_half_up(self.width * factor),
            round_half_up(self.height * factor),
        )
    }

    pub fn half(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The window and screen queries the motion controller depends on.
///
/// Positions and the cursor share one coordinate space whose origin is the top-left
/// corner of the work area.
pub trait Geometry {
    /// False once the window has been torn down.
    fn is_alive(&self) -> bool;
    fn position(&self) -> Point;
    fn set_position(&self, position: Point);
    fn size(&self) -> Size;
    fn set_size(&self, size: Size);
    fn work_area(&self) -> Size;
    fn cursor(&self) -> Option<Point>;
    /// When enabled, pointer events go to whatever lies beneath the window.
    fn set_pointer_passthrough(&self, passthrough: bool);
}
