//! Debounced save scheduling.
//!
//! The engine performs no I/O. Instead, every board mutation notifies a
//! [`ChangeNotifier`]; the [`SaveScheduler`] implementation of that trait
//! tracks dirtiness and a debounce deadline (a fixed quiet period after the
//! last change). The driving loop polls [`SaveScheduler::take_due`] and
//! dispatches the actual save when it returns `true`.
//!
//! A later mutation within the quiet period restarts the timer, implicitly
//! superseding the pending save. An already dispatched save is never
//! cancelled; if mutations land while it is in flight, the scheduler simply
//! goes dirty again and the next save wins (last-write-wins, no merge).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use bento_config::Config;
use tracing::{debug, trace};

/// Receives a notification after every board mutation.
///
/// Passed into the board explicitly at construction; the engine never resolves
/// its save collaborator through ambient state.
pub trait ChangeNotifier: fmt::Debug {
    fn mark_changed(&mut self);
}

/// Notifier that ignores every change, handy when no auto-save is wired up.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl ChangeNotifier for NullNotifier {
    fn mark_changed(&mut self) {}
}

/// Clock the scheduler reads time from.
///
/// The driving loop sets the time once per tick; tests set it manually. Clones
/// share the same time.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    time: Rc<Cell<Duration>>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.time.get()
    }

    pub fn set(&self, time: Duration) {
        self.time.set(time);
    }

    pub fn advance(&self, by: Duration) {
        self.time.set(self.time.get() + by);
    }
}

/// Debounced dirty-tracking for the external auto-save collaborator.
#[derive(Debug)]
pub struct SaveScheduler {
    clock: Clock,
    delay: Duration,
    enabled: bool,
    has_unsaved_changes: bool,
    /// Time at which the pending save becomes due, if one is scheduled.
    deadline: Option<Duration>,
    last_save_time: Option<Duration>,
    last_error: Option<String>,
}

impl SaveScheduler {
    pub fn new(clock: Clock, delay: Duration) -> Self {
        Self {
            clock,
            delay,
            enabled: true,
            has_unsaved_changes: false,
            deadline: None,
            last_save_time: None,
            last_error: None,
        }
    }

    pub fn from_config(clock: Clock, config: &Config) -> Self {
        let mut scheduler = Self::new(clock, Duration::from_millis(config.autosave.delay_ms));
        scheduler.enabled = !config.autosave.off;
        scheduler
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn last_save_time(&self) -> Option<Duration> {
        self.last_save_time
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enables or disables auto-saving. Disabling cancels any pending
    /// (not yet dispatched) save.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.deadline = None;
        }
    }

    /// Whether a scheduled save has become due. Clears the deadline, so each
    /// dirty period yields exactly one dispatch; the caller performs the save.
    pub fn take_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.clock.now() >= deadline => {
                self.deadline = None;
                debug!("auto-save due");
                true
            }
            _ => false,
        }
    }

    /// Records a successful save dispatched earlier.
    pub fn save_finished(&mut self) {
        self.has_unsaved_changes = false;
        self.last_save_time = Some(self.clock.now());
        self.last_error = None;
        debug!("auto-save finished");
    }

    /// Records a failed save; the state stays dirty.
    pub fn save_failed(&mut self, error: impl Into<String>) {
        let error = error.into();
        debug!("auto-save failed: {error}");
        self.last_error = Some(error);
    }

    /// Forgets dirtiness without saving, e.g. right after loading from the
    /// persistence collaborator.
    pub fn clear_unsaved_changes(&mut self) {
        self.has_unsaved_changes = false;
        self.deadline = None;
        self.last_save_time = Some(self.clock.now());
    }
}

impl ChangeNotifier for SaveScheduler {
    fn mark_changed(&mut self) {
        if !self.enabled {
            return;
        }

        self.has_unsaved_changes = true;
        self.deadline = Some(self.clock.now() + self.delay);
        trace!("auto-save scheduled in {:?}", self.delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> (Clock, SaveScheduler) {
        let clock = Clock::new();
        let scheduler = SaveScheduler::new(clock.clone(), Duration::from_millis(2000));
        (clock, scheduler)
    }

    #[test]
    fn save_becomes_due_after_the_quiet_period() {
        let (clock, mut scheduler) = scheduler();

        scheduler.mark_changed();
        assert!(scheduler.has_unsaved_changes());
        assert!(!scheduler.take_due());

        clock.advance(Duration::from_millis(1999));
        assert!(!scheduler.take_due());

        clock.advance(Duration::from_millis(1));
        assert!(scheduler.take_due());
        // One dispatch per dirty period.
        assert!(!scheduler.take_due());

        scheduler.save_finished();
        assert!(!scheduler.has_unsaved_changes());
    }

    #[test]
    fn a_new_change_restarts_the_timer() {
        let (clock, mut scheduler) = scheduler();

        scheduler.mark_changed();
        clock.advance(Duration::from_millis(1500));
        scheduler.mark_changed();

        clock.advance(Duration::from_millis(1500));
        assert!(!scheduler.take_due());

        clock.advance(Duration::from_millis(500));
        assert!(scheduler.take_due());
    }

    #[test]
    fn disabling_cancels_the_pending_save() {
        let (clock, mut scheduler) = scheduler();

        scheduler.mark_changed();
        scheduler.set_enabled(false);
        clock.advance(Duration::from_secs(10));
        assert!(!scheduler.take_due());

        scheduler.mark_changed();
        clock.advance(Duration::from_secs(10));
        assert!(!scheduler.take_due());
    }

    #[test]
    fn failed_save_keeps_the_state_dirty() {
        let (clock, mut scheduler) = scheduler();

        scheduler.mark_changed();
        clock.advance(Duration::from_secs(2));
        assert!(scheduler.take_due());

        scheduler.save_failed("persistence unavailable");
        assert!(scheduler.has_unsaved_changes());
        assert_eq!(scheduler.last_error(), Some("persistence unavailable"));

        scheduler.save_finished();
        assert_eq!(scheduler.last_error(), None);
    }

    #[test]
    fn clear_unsaved_changes_drops_the_deadline() {
        let (clock, mut scheduler) = scheduler();

        scheduler.mark_changed();
        scheduler.clear_unsaved_changes();
        clock.advance(Duration::from_secs(10));
        assert!(!scheduler.take_due());
        assert!(!scheduler.has_unsaved_changes());
    }
}
