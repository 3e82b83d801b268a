//! The viewport an instrumented page view runs in: current path, scroll
//! listeners and the count of live timers.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Scroll geometry at one instant, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Metrics that put the viewport at `percentage` of a page of the given size.
    pub fn at_percentage(percentage: f64, scroll_height: f64, client_height: f64) -> Self {
        let range = (scroll_height - client_height).max(0.0);
        Self::new(range * percentage / 100.0, scroll_height, client_height)
    }

    /// `scrollTop / (scrollHeight - clientHeight) * 100`, clamped to 0..=100.
    /// `None` when the page cannot scroll.
    pub fn percentage(&self) -> Option<f64> {
        let range = self.scroll_height - self.client_height;
        if range <= 0.0 || !range.is_finite() || !self.scroll_top.is_finite() {
            return None;
        }
        Some((self.scroll_top / range * 100.0).clamp(0.0, 100.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Passive listeners promise not to block scrolling.
    pub passive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type ScrollListener = Arc<dyn Fn(&ScrollMetrics) + Send + Sync>;

struct Registered {
    id: ListenerId,
    options: ListenerOptions,
    listener: ScrollListener,
}

pub struct PageContext {
    path: Mutex<String>,
    listeners: Mutex<Vec<Registered>>,
    next_id: AtomicU64,
    timers: AtomicUsize,
}

impl PageContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(normalize_path(&path.into())),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            timers: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> String {
        self.path.lock().clone()
    }

    pub fn navigate(&self, path: &str) {
        *self.path.lock() = normalize_path(path);
    }

    pub fn add_scroll_listener(&self, options: ListenerOptions, listener: ScrollListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push(Registered {
            id,
            options,
            listener,
        });
        id
    }

    /// Returns whether the listener was still attached.
    pub fn remove_scroll_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        before != listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn passive_listener_count(&self) -> usize {
        self.listeners.lock().iter().filter(|l| l.options.passive).count()
    }

    /// Deliver one scroll event to every attached listener, in attach order.
    /// Listeners run outside the registry lock and may detach themselves.
    pub fn dispatch_scroll(&self, metrics: ScrollMetrics) {
        let snapshot: Vec<ScrollListener> = self
            .listeners
            .lock()
            .iter()
            .map(|l| Arc::clone(&l.listener))
            .collect();

        for listener in snapshot {
            listener(&metrics);
        }
    }

    pub fn active_timers(&self) -> usize {
        self.timers.load(Ordering::SeqCst)
    }

    pub(crate) fn timer_started(&self) {
        self.timers.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn timer_stopped(&self) {
        let _ = self
            .timers
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

impl Default for PageContext {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Keep only the path component: no scheme/host, query or fragment.
pub fn normalize_path(raw: &str) -> String {
    let raw = raw.trim();
    let without_origin = match raw.find("://") {
        Some(i) => {
            let rest = &raw[i + 3..];
            rest.find('/').map(|j| &rest[j..]).unwrap_or("/")
        }
        None => raw,
    };
    let path = without_origin
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
