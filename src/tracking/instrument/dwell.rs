//! Periodic time-on-page sampling.

use crate::models::payload::{Fields, TimeSpent};
use crate::tracking::page::PageContext;
use crate::tracking::recorder::EventRecorder;
use crate::utils::time::seconds_between;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Turns tick instants into `time_spent` samples.
#[derive(Debug, Clone)]
pub struct DwellClock {
    started_at: i64,
    last_tick: i64,
    interval_secs: u64,
}

impl DwellClock {
    pub fn new(now_ms: i64, interval_secs: u64) -> Self {
        Self {
            started_at: now_ms,
            last_tick: now_ms,
            interval_secs,
        }
    }

    pub fn tick(&mut self, now_ms: i64) -> TimeSpent {
        let sample = TimeSpent {
            duration_seconds: Some(seconds_between(self.last_tick, now_ms)),
            total_time_on_page: Some(seconds_between(self.started_at, now_ms)),
            tracking_interval: Some(self.interval_secs),
            extra: Fields::new(),
        };
        self.last_tick = self.last_tick.max(now_ms);
        sample
    }
}

/// Manually driven dwell sampling: each [`DwellTracker::tick`] records one sample
/// at the recorder's clock.
pub struct DwellTracker {
    recorder: Arc<EventRecorder>,
    clock: DwellClock,
}

impl DwellTracker {
    pub fn new(recorder: Arc<EventRecorder>, interval_secs: u64) -> Self {
        let now = recorder.clock().now_millis();
        Self {
            recorder,
            clock: DwellClock::new(now, interval_secs),
        }
    }

    pub fn tick(&mut self) -> TimeSpent {
        let now = self.recorder.clock().now_millis();
        let sample = self.clock.tick(now);
        self.recorder.track_time_spent(sample.clone());
        sample
    }
}

/// Keeps the dwell timer thread alive; stops it on [`DwellGuard::dispose`] or drop.
pub struct DwellGuard {
    page: Arc<PageContext>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl DwellGuard {
    pub fn is_active(&self) -> bool {
        self.stop.is_some()
    }

    /// Cancel the interval and wait for the timer thread. Safe to call more than once.
    pub fn dispose(&mut self) {
        let Some(stop) = self.stop.take() else {
            return;
        };
        let _ = stop.send(());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("dwell timer thread panicked");
        }
        self.page.timer_stopped();
        tracing::debug!(page = %self.page.path(), "dwell tracking stopped");
    }
}

impl Drop for DwellGuard {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Record a `time_spent` sample every `interval` on a dedicated thread.
/// `trackingInterval` is reported in whole seconds, so the interval must be
/// at least one second.
pub fn start_dwell_tracking(recorder: Arc<EventRecorder>, interval: Duration) -> std::io::Result<DwellGuard> {
    if interval < Duration::from_secs(1) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("dwell interval must be at least one second, got {interval:?}"),
        ));
    }

    let page = Arc::clone(recorder.page());
    let (tx, rx) = mpsc::channel::<()>();

    let interval_secs = interval.as_secs();
    let handle = thread::Builder::new()
        .name("trackify-dwell".into())
        .spawn(move || {
            let mut tracker = DwellTracker::new(recorder, interval_secs);
            loop {
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        tracker.tick();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        })?;

    page.timer_started();
    tracing::debug!(page = %page.path(), interval_secs, "dwell tracking started");

    Ok(DwellGuard {
        page,
        stop: Some(tx),
        handle: Some(handle),
    })
}
