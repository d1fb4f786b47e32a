use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

const SLOT_EMPTY: u8 = 0;
const SLOT_DISABLED: u8 = 1;
const SLOT_ENABLED: u8 = 2;

type Observer = Arc<dyn Fn(bool) + Send + Sync>;

/// Live auto-refresh flag plus the one-slot save area used by modal workflows.
///
/// Cloning yields another handle to the same flag. The scheduler reads
/// [`RefreshController::is_enabled`] at the top of every tick and again after
/// each response, so every write here is visible to the next read.
#[derive(Clone)]
pub struct RefreshController {
    inner: Arc<Inner>,
}

struct Inner {
    enabled: AtomicBool,
    saved: AtomicU8,
    observer: Option<Observer>,
}

impl RefreshController {
    pub fn new(enabled: bool) -> Self {
        Self::build(enabled, None)
    }

    /// Like [`RefreshController::new`], but `observer` is called with the new
    /// value whenever the flag changes (the page's auto-refresh checkbox).
    pub fn with_observer(enabled: bool, observer: impl Fn(bool) + Send + Sync + 'static) -> Self {
        Self::build(enabled, Some(Arc::new(observer)))
    }

    fn build(enabled: bool, observer: Option<Observer>) -> Self {
        Self {
            inner: Arc::new(Inner {
                enabled: AtomicBool::new(enabled),
                saved: AtomicU8::new(SLOT_EMPTY),
                observer,
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    /// True while a suspension is outstanding (suspended and not yet resumed).
    pub fn is_suspended(&self) -> bool {
        self.inner.saved.load(Ordering::SeqCst) != SLOT_EMPTY
    }

    /// Direct write from the user-facing toggle.
    pub fn set_enabled(&self, enabled: bool) {
        let previous = self.inner.enabled.swap(enabled, Ordering::SeqCst);
        self.notify_if_changed(previous, enabled);
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self) -> bool {
        let previous = self.inner.enabled.fetch_xor(true, Ordering::SeqCst);
        self.notify_if_changed(previous, !previous);
        !previous
    }

    /// Saves the current flag and disables refresh.
    ///
    /// Only one suspension can be outstanding: while one is, the saved value is
    /// kept and this call only forces the flag off. Returns whether this call
    /// took the save slot.
    pub fn suspend(&self) -> bool {
        let previous = self.inner.enabled.swap(false, Ordering::SeqCst);
        let slot = if previous { SLOT_ENABLED } else { SLOT_DISABLED };
        let took_slot = self
            .inner
            .saved
            .compare_exchange(SLOT_EMPTY, slot, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        self.notify_if_changed(previous, false);
        took_slot
    }

    /// Ends the outstanding suspension, re-enabling refresh if it was enabled
    /// when suspended. A resume without an outstanding suspension is a no-op.
    ///
    /// Returns the flag value after the call.
    pub fn resume(&self) -> bool {
        if self.inner.saved.swap(SLOT_EMPTY, Ordering::SeqCst) == SLOT_ENABLED {
            let previous = self.inner.enabled.swap(true, Ordering::SeqCst);
            self.notify_if_changed(previous, true);
        }
        self.is_enabled()
    }

    fn notify_if_changed(&self, previous: bool, current: bool) {
        if previous != current {
            if let Some(observer) = &self.inner.observer {
                observer(current);
            }
        }
    }
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl fmt::Debug for RefreshController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshController")
            .field("enabled", &self.is_enabled())
            .field("suspended", &self.is_suspended())
            .finish()
    }
}
