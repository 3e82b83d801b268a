//! Activity tracking: session identity, recording, instrumentation and the
//! in-memory activity cache.

pub mod cache;
pub mod instrument;
pub mod page;
pub mod recorder;
pub mod session;
pub mod tracker;

pub use cache::ActivityCache;
pub use page::{PageContext, ScrollMetrics};
pub use recorder::EventRecorder;
pub use session::{SessionContext, SessionIdentity};
pub use tracker::{ActivityTracker, TrackerSettings};
