use std::ops::ControlFlow;
use std::time::Duration;

/// Callback run on every period. Returning `Break` ends the repetition.
pub type TickFn = Box<dyn FnMut() -> ControlFlow<()>>;

/// A source of cancellable repeating callbacks on the current thread.
///
/// `cancel` must take effect immediately: once it returns, the callback never runs
/// again.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, period: Duration, tick: TickFn) -> Self::Handle;
    fn cancel(&self, handle: Self::Handle);
}
