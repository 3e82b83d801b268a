//! Scroll-depth milestones.

use crate::tracking::page::{ListenerId, ListenerOptions, PageContext, ScrollMetrics};
use crate::tracking::recorder::EventRecorder;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How thresholds crossed by a single scroll event are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPolicy {
    /// One event per newly crossed threshold, ascending.
    #[default]
    Each,
    /// One event for the deepest newly crossed threshold; the shallower
    /// ones are marked as reached without an event.
    Deepest,
}

/// One milestone to report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub depth: u32,
    pub previous_max_depth: f64,
}

/// High-water mark plus the thresholds still pending.
#[derive(Debug, Clone)]
pub struct ScrollDepthState {
    thresholds: Vec<u32>,
    reached: Vec<bool>,
    max_depth: f64,
    policy: ThresholdPolicy,
}

impl ScrollDepthState {
    pub fn new(thresholds: &[u32], policy: ThresholdPolicy) -> Self {
        let mut thresholds: Vec<u32> = thresholds
            .iter()
            .copied()
            .filter(|t| (1..=100).contains(t))
            .collect();
        thresholds.sort_unstable();
        thresholds.dedup();
        let reached = vec![false; thresholds.len()];
        Self {
            thresholds,
            reached,
            max_depth: 0.0,
            policy,
        }
    }

    pub fn max_depth(&self) -> f64 {
        self.max_depth
    }

    pub fn thresholds(&self) -> &[u32] {
        &self.thresholds
    }

    /// True once every threshold fired; further scrolling is a no-op.
    pub fn is_complete(&self) -> bool {
        self.reached.iter().all(|r| *r)
    }

    /// Feed one scroll percentage; returns the milestones it produced.
    pub fn observe(&mut self, percentage: f64) -> Vec<Crossing> {
        if !percentage.is_finite() || percentage <= self.max_depth {
            return Vec::new();
        }

        let previous_max_depth = self.max_depth;
        self.max_depth = percentage.min(100.0);

        let mut crossed = Vec::new();
        for (i, t) in self.thresholds.iter().enumerate() {
            if !self.reached[i] && self.max_depth >= f64::from(*t) {
                self.reached[i] = true;
                crossed.push(Crossing {
                    depth: *t,
                    previous_max_depth,
                });
            }
        }

        match self.policy {
            ThresholdPolicy::Each => crossed,
            ThresholdPolicy::Deepest => crossed.pop().into_iter().collect(),
        }
    }
}

/// Keeps the scroll listener attached; detaches on [`ScrollGuard::dispose`] or drop.
pub struct ScrollGuard {
    page: Arc<PageContext>,
    id: Option<ListenerId>,
    state: Arc<Mutex<ScrollDepthState>>,
}

impl ScrollGuard {
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Current high-water mark.
    pub fn max_depth(&self) -> f64 {
        self.state.lock().max_depth()
    }

    /// Detach the listener. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(id) = self.id.take() {
            self.page.remove_scroll_listener(id);
            tracing::debug!(page = %self.page.path(), "scroll tracking stopped");
        }
    }
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Attach a passive scroll listener to the recorder's page that records a
/// `scroll` event for each milestone.
pub fn start_scroll_tracking(
    recorder: Arc<EventRecorder>,
    thresholds: &[u32],
    policy: ThresholdPolicy,
) -> ScrollGuard {
    let page = Arc::clone(recorder.page());
    let state = Arc::new(Mutex::new(ScrollDepthState::new(thresholds, policy)));

    let listener_state = Arc::clone(&state);
    let id = page.add_scroll_listener(
        ListenerOptions { passive: true },
        Arc::new(move |metrics: &ScrollMetrics| {
            let Some(percentage) = metrics.percentage() else {
                return;
            };
            let crossings = listener_state.lock().observe(percentage);
            for c in crossings {
                recorder.track_scroll(c.depth, c.previous_max_depth);
            }
        }),
    );

    tracing::debug!(page = %page.path(), "scroll tracking started");

    ScrollGuard {
        page,
        id: Some(id),
        state,
    }
}
