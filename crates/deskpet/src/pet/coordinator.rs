use super::geometry::{Geometry, Size};
use super::motion::Motion;
use super::scheduler::Scheduler;
use super::{PetError, round_point};
use crate::config::{ConfigError, MotionConfig};
use petctl::command::{Mode, SizePreset};
use petctl::wm::Point;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    pointer: Point,
    origin: Point,
}

/// Owns the pet's mode and size and the one repeating timer that moves it.
///
/// Lives behind `Rc<RefCell<_>>`; the timer callback only holds a weak reference, so
/// dropping the coordinator also ends the timer.
pub struct Coordinator<G: Geometry, S: Scheduler> {
    geometry: G,
    scheduler: S,
    config: MotionConfig,
    motion: Motion,
    size_scale: f64,
    ticker: Option<S::Handle>,
    drag: Option<DragAnchor>,
    rng: StdRng,
    this: Weak<RefCell<Self>>,
}

impl<G, S> Coordinator<G, S>
where
    G: Geometry + 'static,
    S: Scheduler + 'static,
{
    pub fn new(geometry: G, scheduler: S, config: MotionConfig) -> Rc<RefCell<Self>> {
        Self::with_rng(geometry, scheduler, config, StdRng::from_entropy())
    }

    pub fn with_rng(
        geometry: G,
        scheduler: S,
        config: MotionConfig,
        rng: StdRng,
    ) -> Rc<RefCell<Self>> {
        let coordinator = Rc::new_cyclic(|this| {
            RefCell::new(Self {
                geometry,
                scheduler,
                config,
                motion: Motion::Static,
                size_scale: SizePreset::default().scale(),
                ticker: None,
                drag: None,
                rng,
                this: this.clone(),
            })
        });
        coordinator.borrow_mut().place_at_home();
        coordinator
    }

    /// Bottom-right corner of the work area, inset by the configured margins.
    fn place_at_home(&mut self) {
        self.apply_size();
        let area = self.geometry.work_area();
        let size = self.geometry.size();
        let home = Point::new(
            (area.width - size.width - self.config.home_margin_x).max(0.0),
            (area.height - size.height - self.config.home_margin_y).max(0.0),
        );
        self.geometry.set_position(round_point(home));
        self.geometry
            .set_pointer_passthrough(Mode::Static.passes_pointer_through());
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn mode(&self) -> Mode {
        self.motion.mode()
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn size_scale(&self) -> f64 {
        self.size_scale
    }

    pub fn size_preset(&self) -> Option<SizePreset> {
        SizePreset::from_scale(self.size_scale)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode() && (self.is_ticking() || !self.motion.is_moving()) {
            log::debug!("Already in {} mode", mode);
            return;
        }

        self.stop_ticker();
        self.drag = None;
        self.motion = Motion::start(mode, self.geometry.work_area(), &self.config);
        self.geometry
            .set_pointer_passthrough(mode.passes_pointer_through());
        log::info!("Mode set to {}", mode);

        if !self.motion.is_moving() {
            return;
        }
        if self.geometry.is_alive() {
            self.start_ticker();
        } else {
            log::debug!("Window is gone, not starting the {} timer", mode);
        }
    }

    pub fn set_size_scale(&mut self, scale: f64) -> Result<(), PetError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PetError::InvalidScale(scale));
        }
        if scale == self.size_scale {
            return Ok(());
        }

        self.size_scale = scale;
        self.apply_size();
        log::info!("Size scale set to {}", scale);
        Ok(())
    }

    fn apply_size(&self) {
        let base = Size::new(self.config.base_width, self.config.base_height);
        self.geometry.set_size(base.scaled(self.size_scale));
    }

    /// One animation step. Skipped silently once the window has been torn down.
    pub fn tick(&mut self) {
        if !self.geometry.is_alive() {
            log::trace!("Window is gone, skipping tick");
            return;
        }
        if let Some(next) = self
            .motion
            .advance(&self.geometry, &self.config, &mut self.rng)
        {
            self.geometry.set_position(next);
        }
    }

    /// Anchors a manual drag at the current pointer. Only honoured in static mode.
    pub fn begin_drag(&mut self) {
        if self.motion.is_moving() {
            return;
        }
        self.drag = self.geometry.cursor().map(|pointer| DragAnchor {
            pointer,
            origin: self.geometry.position(),
        });
    }

    pub fn drag(&mut self) {
        let Some(anchor) = self.drag else {
            return;
        };
        if !self.geometry.is_alive() {
            return;
        }
        if let Some(pointer) = self.geometry.cursor() {
            let next = anchor.origin.offset(
                pointer.x - anchor.pointer.x,
                pointer.y - anchor.pointer.y,
            );
            self.geometry.set_position(round_point(next));
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Swaps in reloaded settings without interrupting the current session. Invalid
    /// settings are refused and the current ones stay in effect.
    pub fn reconfigure(&mut self, config: MotionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let resized = config.base_width != self.config.base_width
            || config.base_height != self.config.base_height;
        let retimed = config.tick_interval != self.config.tick_interval;
        self.config = config;

        if resized {
            self.apply_size();
        }
        if retimed && self.is_ticking() {
            self.stop_ticker();
            self.start_ticker();
        }
        Ok(())
    }

    fn start_ticker(&mut self) {
        let this = self.this.clone();
        let handle = self.scheduler.schedule(
            self.config.tick_interval,
            Box::new(move || {
                let Some(coordinator) = this.upgrade() else {
                    return ControlFlow::Break(());
                };
                match coordinator.try_borrow_mut() {
                    Ok(mut coordinator) => coordinator.tick(),
                    Err(_) => log::trace!("Coordinator busy, skipping tick"),
                }
                ControlFlow::Continue(())
            }),
        );
        self.ticker = Some(handle);
        log::debug!("Started motion timer every {:?}", self.config.tick_interval);
    }
}

impl<G: Geometry, S: Scheduler> Coordinator<G, S> {
    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            self.scheduler.cancel(handle);
            log::debug!("Stopped motion timer");
        }
    }
}

impl<G: Geometry, S: Scheduler> Drop for Coordinator<G, S> {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
