//! Listener and timer driven producers. Both hand back scoped guards that
//! release their listener or timer on drop.

pub mod dwell;
pub mod scroll;

pub use dwell::{DwellClock, DwellGuard, DwellTracker, start_dwell_tracking};
pub use scroll::{Crossing, ScrollDepthState, ScrollGuard, ThresholdPolicy, start_scroll_tracking};
