pub mod activity;
pub mod context;
pub mod dashboard;
pub mod event_type;
pub mod payload;
