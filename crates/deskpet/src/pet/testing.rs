use super::geometry::{Geometry, Size};
use super::scheduler::{Scheduler, TickFn};
use petctl::wm::Point;
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Screen {
    pub alive: bool,
    pub position: Point,
    pub size: Size,
    pub work_area: Size,
    pub cursor: Option<Point>,
    pub passthrough: bool,
    pub moves: usize,
    pub resizes: usize,
}

/// In-memory window on a fixed screen.
#[derive(Clone)]
pub struct FakeScreen(Rc<RefCell<Screen>>);

impl FakeScreen {
    pub fn new(work_area: Size) -> Self {
        Self(Rc::new(RefCell::new(Screen {
            alive: true,
            position: Point::default(),
            size: Size::default(),
            work_area,
            cursor: None,
            passthrough: false,
            moves: 0,
            resizes: 0,
        })))
    }

    pub fn state(&self) -> Ref<'_, Screen> {
        self.0.borrow()
    }

    pub fn with(&self, f: impl FnOnce(&mut Screen)) {
        f(&mut self.0.borrow_mut());
    }
}

impl Geometry for FakeScreen {
    fn is_alive(&self) -> bool {
        self.0.borrow().alive
    }

    fn position(&self) -> Point {
        self.0.borrow().position
    }

    fn set_position(&self, position: Point) {
        let mut screen = self.0.borrow_mut();
        screen.position = position;
        screen.moves += 1;
    }

    fn size(&self) -> Size {
        self.0.borrow().size
    }

    fn set_size(&self, size: Size) {
        let mut screen = self.0.borrow_mut();
        screen.size = size;
        screen.resizes += 1;
    }

    fn work_area(&self) -> Size {
        self.0.borrow().work_area
    }

    fn cursor(&self) -> Option<Point> {
        self.0.borrow().cursor
    }

    fn set_pointer_passthrough(&self, passthrough: bool) {
        self.0.borrow_mut().passthrough = passthrough;
    }
}

struct Task {
    period: Duration,
    tick: Option<TickFn>,
    cancelled: bool,
}

/// Scheduler whose callbacks only run when the test calls [`ManualScheduler::fire`].
#[derive(Clone, Default)]
pub struct ManualScheduler(Rc<RefCell<Vec<Task>>>);

impl ManualScheduler {
    /// Runs every live callback once, returning how many ran.
    pub fn fire(&self) -> usize {
        let count = self.0.borrow().len();
        let mut ran = 0;

        for id in 0..count {
            let taken = self.0.borrow_mut()[id].tick.take();
            let Some(mut tick) = taken else {
                continue;
            };
            ran += 1;
            let flow = tick();

            let mut tasks = self.0.borrow_mut();
            if flow.is_continue() && !tasks[id].cancelled {
                tasks[id].tick = Some(tick);
            }
        }
        ran
    }

    pub fn fire_n(&self, n: usize) {
        for _ in 0..n {
            self.fire();
        }
    }

    pub fn active(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|t| t.tick.is_some())
            .count()
    }

    pub fn active_periods(&self) -> Vec<Duration> {
        self.0
            .borrow()
            .iter()
            .filter(|t| t.tick.is_some())
            .map(|t| t.period)
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = usize;

    fn schedule(&self, period: Duration, tick: TickFn) -> usize {
        let mut tasks = self.0.borrow_mut();
        tasks.push(Task {
            period,
            tick: Some(tick),
            cancelled: false,
        });
        tasks.len() - 1
    }

    fn cancel(&self, handle: usize) {
        if let Some(task) = self.0.borrow_mut().get_mut(handle) {
            task.tick = None;
            task.cancelled = true;
        }
    }
}
