use crate::config::Config;
use crate::errors::AppResult;
use crate::tracking::session::{FileSessionStorage, SessionIdentity};
use crate::utils::time::SystemClock;

/// Print the session id on its own line, so scripts can capture it.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let ctx = SessionIdentity::resolve(&FileSessionStorage::new(&cfg.session_file), &SystemClock);

    if !ctx.is_durable() {
        tracing::warn!(path = %cfg.session_file, "session id could not be persisted; it lasts for this run only");
    }

    println!("{}", ctx.get_session_id());
    Ok(())
}
