use crate::traits::LoadingSurface;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Requests answered faster than this never show the indicator.
pub const DEFAULT_LOADER_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    Idle,
    Pending,
    Visible,
}

enum Inner {
    Idle,
    Pending { epoch: u64, timer: JoinHandle<()> },
    Visible,
}

struct Shared {
    inner: Inner,
    epoch: u64,
}

/// Debounced loading overlay: one indicator, overlapping requests collapse.
pub struct LoadingIndicator {
    delay: Duration,
    shared: Arc<Mutex<Shared>>,
    surface: Arc<dyn LoadingSurface>,
}

impl LoadingIndicator {
    pub fn new(surface: Arc<dyn LoadingSurface>, delay: Duration) -> Self {
        LoadingIndicator {
            delay,
            shared: Arc::new(Mutex::new(Shared {
                inner: Inner::Idle,
                epoch: 0,
            })),
            surface,
        }
    }

    pub fn state(&self) -> LoadingState {
        match lock(&self.shared).inner {
            Inner::Idle => LoadingState::Idle,
            Inner::Pending { .. } => LoadingState::Pending,
            Inner::Visible => LoadingState::Visible,
        }
    }

    /// Arm the delay timer. Must be called from inside a tokio runtime.
    pub fn show(&self) {
        let mut shared = lock(&self.shared);
        if !matches!(shared.inner, Inner::Idle) {
            return;
        }
        shared.epoch += 1;
        let epoch = shared.epoch;

        let delay = self.delay;
        let state = Arc::clone(&self.shared);
        let surface = Arc::clone(&self.surface);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut shared = lock(&state);
            // A cancelled timer may still wake up; only its own arming counts
            if matches!(shared.inner, Inner::Pending { epoch: e, .. } if e == epoch) {
                shared.inner = Inner::Visible;
                surface.show();
            }
        });
        shared.inner = Inner::Pending { epoch, timer };
        debug!("Loading indicator armed ({:?})", delay);
    }

    pub fn hide(&self) {
        let mut shared = lock(&self.shared);
        match std::mem::replace(&mut shared.inner, Inner::Idle) {
            Inner::Idle => {}
            Inner::Pending { timer, .. } => {
                timer.abort();
                debug!("Loading finished before the indicator was shown");
            }
            Inner::Visible => self.surface.hide(),
        }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        if let Inner::Pending { timer, .. } = &lock(&self.shared).inner {
            timer.abort();
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // The state is a plain enum, still usable after a panic elsewhere
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
