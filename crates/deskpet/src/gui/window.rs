use crate::pet::{Geometry, Scheduler, Size, TickFn};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};
use petctl::wm::{self, MonitorName, Point};
use std::cell::Cell;
use std::ops::ControlFlow;
use std::time::Duration;

const FALLBACK_WORK_AREA: Size = Size {
    width: 1920.0,
    height: 1080.0,
};

/// Overlay surface pinned to the top-left corner; its margins are the pet's position.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("deskpet"));
    // stay inside the area other bars and docks leave free
    window.set_exclusive_zone(0);
    for edge in [Edge::Left, Edge::Top] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::OnDemand);
}

pub fn get_monitor_by_name(name: &MonitorName) -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    let monitors = display.monitors();
    (0..monitors.n_items()).find_map(|i| {
        monitors
            .item(i)
            .and_then(|item| item.downcast::<gdk::Monitor>().ok())
            .filter(|m| m.connector().is_some_and(|n| n.as_str() == **name))
    })
}

pub fn set_window_monitor(window: &gtk::ApplicationWindow, monitor_name: &MonitorName) {
    if let Some(monitor) = get_monitor_by_name(monitor_name) {
        window.set_monitor(Some(&monitor));
    }
}

/// [`Geometry`] backed by the layer-shell window. Holds only a weak reference, so a
/// closed window simply reads as not alive.
///
/// Work area and cursor are measured on the monitor the window was pinned to, not on
/// whichever monitor has focus.
pub struct PetWindow {
    window: glib::WeakRef<gtk::ApplicationWindow>,
    monitor: Option<MonitorName>,
    passthrough: Cell<bool>,
}

impl PetWindow {
    pub fn new(window: &gtk::ApplicationWindow, monitor: Option<MonitorName>) -> Self {
        Self {
            window: window.downgrade(),
            monitor,
            passthrough: Cell::new(false),
        }
    }

    pub fn monitor(&self) -> Option<&MonitorName> {
        self.monitor.as_ref()
    }

    /// Re-applies the child size and the input region, neither of which can take effect
    /// before the window has a child and a surface.
    pub fn sync_surface(&self) {
        if let Some(window) = self.window.upgrade() {
            let (width, height) = window.default_size();
            if let Some(child) = window.child() {
                child.set_size_request(width, height);
            }
            self.apply_input_region(&window);
        }
    }

    fn apply_input_region(&self, window: &gtk::ApplicationWindow) {
        let Some(surface) = window.surface() else {
            return;
        };
        let region = if self.passthrough.get() {
            cairo::Region::create()
        } else {
            let (width, height) = window.default_size();
            cairo::Region::create_rectangle(&cairo::RectangleInt::new(0, 0, width, height))
        };
        surface.set_input_region(&region);
    }

    fn monitor_size(window: &gtk::ApplicationWindow) -> Option<Size> {
        let display = gdk::Display::default()?;
        let monitor = window
            .surface()
            .and_then(|s| display.monitor_at_surface(&s))?;
        let geometry = monitor.geometry();
        Some(Size::new(geometry.width() as f64, geometry.height() as f64))
    }

    fn pointer_over(&self, window: &gtk::ApplicationWindow) -> Option<Point> {
        let (x, y, _) = gdk::Display::default()
            .and_then(|d| d.default_seat())
            .and_then(|s| s.pointer())
            .zip(window.surface())
            .and_then(|(p, s)| s.device_position(&p))?;
        Some(self.position().offset(x, y))
    }
}

impl Geometry for PetWindow {
    fn is_alive(&self) -> bool {
        self.window.upgrade().is_some_and(|w| w.is_realized())
    }

    fn position(&self) -> Point {
        self.window
            .upgrade()
            .map(|w| {
                Point::new(
                    w.margin(Edge::Left) as f64,
                    w.margin(Edge::Top) as f64,
                )
            })
            .unwrap_or_default()
    }

    fn set_position(&self, position: Point) {
        if let Some(window) = self.window.upgrade() {
            window.set_margin(Edge::Left, position.x as i32);
            window.set_margin(Edge::Top, position.y as i32);
        }
    }

    fn size(&self) -> Size {
        self.window
            .upgrade()
            .map(|w| {
                let (width, height) = w.default_size();
                Size::new(width as f64, height as f64)
            })
            .unwrap_or_default()
    }

    fn set_size(&self, size: Size) {
        let Some(window) = self.window.upgrade() else {
            return;
        };
        let (width, height) = (size.width as i32, size.height as i32);
        if let Some(child) = window.child() {
            child.set_size_request(width, height);
        }
        window.set_default_size(width, height);
        self.apply_input_region(&window);
    }

    fn work_area(&self) -> Size {
        wm::get_work_area(self.monitor())
            .map(|area| Size::new(area.width, area.height))
            .or_else(|| self.window.upgrade().and_then(|w| Self::monitor_size(&w)))
            .unwrap_or(FALLBACK_WORK_AREA)
    }

    fn cursor(&self) -> Option<Point> {
        wm::get_cursor_in_work_area(self.monitor())
            .or_else(|| self.window.upgrade().and_then(|w| self.pointer_over(&w)))
    }

    fn set_pointer_passthrough(&self, passthrough: bool) {
        self.passthrough.set(passthrough);
        if let Some(window) = self.window.upgrade() {
            self.apply_input_region(&window);
        }
    }
}

/// Repeating timers on the GTK main loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlibScheduler;

impl Scheduler for GlibScheduler {
    type Handle = glib::SourceId;

    fn schedule(&self, period: Duration, mut tick: TickFn) -> glib::SourceId {
        glib::timeout_add_local(period, move || match tick() {
            ControlFlow::Continue(()) => glib::ControlFlow::Continue,
            ControlFlow::Break(()) => glib::ControlFlow::Break,
        })
    }

    fn cancel(&self, handle: glib::SourceId) {
        handle.remove();
    }
}
