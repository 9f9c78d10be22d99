//! # Host Seams
//!
//! The gateway does not own any UI. It reaches the host application through
//! three small traits:
//!
//! - [`SessionOwner`] navigates back to the login screen after a forced
//!   logout.
//! - [`Notifier`] shows the blocking notification dialog.
//! - [`LoadingIndicator`] drives the process-wide loading spinner.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ErrorKind;

/// Owner of the logged-in session in the host app.
#[async_trait]
pub trait SessionOwner: Send + Sync {
    /// Called after tokens and user info have been cleared.
    async fn on_forced_logout(&self);
}

/// A message for the notification dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: ErrorKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Notice {
            kind,
            title: "알림".to_string(),
            message: message.into(),
        }
    }

    /// The notice shown before navigating to the login screen.
    pub fn session_expired() -> Self {
        Notice {
            kind: ErrorKind::SessionExpired,
            title: "세션 만료".to_string(),
            message: ErrorKind::SessionExpired.user_message().to_string(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

pub trait LoadingIndicator: Send + Sync {
    fn set_loading(&self, loading: bool);
}

/// Sets the indicator on creation and clears it on drop, so every settle
/// path (success, error, panic unwinding) clears it.
pub struct LoadingGuard {
    indicator: Arc<dyn LoadingIndicator>,
}

impl LoadingGuard {
    pub fn new(indicator: Arc<dyn LoadingIndicator>) -> Self {
        indicator.set_loading(true);
        LoadingGuard { indicator }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.indicator.set_loading(false);
    }
}

// =============================================================================
// No-op Implementations
// =============================================================================

/// For hosts without a given channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

#[async_trait]
impl SessionOwner for NoopHost {
    async fn on_forced_logout(&self) {}
}

impl Notifier for NoopHost {
    fn notify(&self, _notice: &Notice) {}
}

impl LoadingIndicator for NoopHost {
    fn set_loading(&self, _loading: bool) {}
}

/// Reference-counting indicator: loading while any request is in flight.
///
/// Hosts that show one spinner for many concurrent requests wrap their own
/// indicator in this.
pub struct CountingIndicator<I> {
    inner: I,
    in_flight: AtomicUsize,
}

impl<I: LoadingIndicator> CountingIndicator<I> {
    pub fn new(inner: I) -> Self {
        CountingIndicator {
            inner,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl<I: LoadingIndicator> LoadingIndicator for CountingIndicator<I> {
    fn set_loading(&self, loading: bool) {
        if loading {
            if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
                self.inner.set_loading(true);
            }
        } else if self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            == Ok(1)
        {
            self.inner.set_loading(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<bool>>);

    impl LoadingIndicator for Recorder {
        fn set_loading(&self, loading: bool) {
            self.0.lock().unwrap().push(loading);
        }
    }

    impl LoadingIndicator for Arc<Recorder> {
        fn set_loading(&self, loading: bool) {
            self.as_ref().set_loading(loading);
        }
    }

    #[test]
    fn test_loading_guard_clears_on_drop() {
        let recorder = Arc::new(Recorder::default());
        {
            let _guard = LoadingGuard::new(recorder.clone());
            assert_eq!(*recorder.0.lock().unwrap(), vec![true]);
        }
        assert_eq!(*recorder.0.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_counting_indicator_toggles_once() {
        let recorder = Arc::new(Recorder::default());
        let counting = Arc::new(CountingIndicator::new(recorder.clone()));

        let a = LoadingGuard::new(counting.clone());
        let b = LoadingGuard::new(counting.clone());
        assert_eq!(counting.in_flight(), 2);
        drop(a);
        assert_eq!(*recorder.0.lock().unwrap(), vec![true]);
        drop(b);
        assert_eq!(*recorder.0.lock().unwrap(), vec![true, false]);

        // Unbalanced clear is ignored.
        counting.set_loading(false);
        assert_eq!(counting.in_flight(), 0);
    }

    #[test]
    fn test_session_expired_notice() {
        let notice = Notice::session_expired();
        assert_eq!(notice.kind, ErrorKind::SessionExpired);
        assert!(notice.message.contains("세션"));
    }
}
