use derive_more::{AsRef, Deref, Display, From, Into};
use hyprland::data::{CursorPosition, Monitor, Monitors};
use hyprland::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MonitorName(String);

crate::impl_string_newtype!(MonitorName);

/// Usable region of a monitor once bars and docks have claimed their edges,
/// in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorkArea {
    /// Top-left corner in global compositor coordinates.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl WorkArea {
    fn from_monitor(monitor: &Monitor) -> Self {
        let (left, top, right, bottom) = monitor.reserved;
        Self::from_parts(
            Point::new(monitor.x as f64, monitor.y as f64),
            (monitor.width as f64, monitor.height as f64),
            monitor.scale as f64,
            (left as f64, top as f64, right as f64, bottom as f64),
        )
    }

    /// Work area of a monitor at `position` with a `pixels` mode, a fractional `scale`
    /// and `reserved` (left, top, right, bottom) logical edges.
    pub fn from_parts(
        position: Point,
        pixels: (f64, f64),
        scale: f64,
        reserved: (f64, f64, f64, f64),
    ) -> Self {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let (left, top, right, bottom) = reserved;

        Self {
            origin: position.offset(left, top),
            width: (pixels.0 / scale - left - right).max(0.0),
            height: (pixels.1 / scale - top - bottom).max(0.0),
        }
    }

    /// Translates a global point into work-area coordinates.
    pub fn localize(&self, global: Point) -> Point {
        Point::new(global.x - self.origin.x, global.y - self.origin.y)
    }
}

/// The named monitor, or the focused one when no name is given.
fn find_monitor(name: Option<&MonitorName>) -> Option<Monitor> {
    Monitors::get().ok()?.into_iter().find(|m| match name {
        Some(name) => m.name == **name,
        None => m.focused,
    })
}

pub fn get_active_monitor() -> Option<MonitorName> {
    find_monitor(None).map(|m| MonitorName::new(m.name))
}

pub fn get_work_area(monitor: Option<&MonitorName>) -> Option<WorkArea> {
    find_monitor(monitor).map(|m| WorkArea::from_monitor(&m))
}

/// Cursor position relative to the work area of `monitor`, even while the pointer sits
/// on another screen.
pub fn get_cursor_in_work_area(monitor: Option<&MonitorName>) -> Option<Point> {
    let cursor = CursorPosition::get().ok()?;
    let area = get_work_area(monitor)?;

    Some(area.localize(Point::new(cursor.x as f64, cursor.y as f64)))
}
