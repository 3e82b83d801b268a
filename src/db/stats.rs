use crate::db::pool::DbPool;
use crate::db::queries::totals;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use crate::utils::time::iso_to_millis;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TOTALS
    //
    let t = totals(&pool.conn)?;
    println!("{}• Total events:{} {}{}{}", CYAN, RESET, GREEN, t.events, RESET);
    println!("{}• Sessions:{} {}{}{}", CYAN, RESET, GREEN, t.sessions, RESET);

    //
    // 3) TIME SPAN
    //
    let fmt_first = t.first.clone().unwrap_or_else(|| format!("{GREY}--{RESET}"));
    let fmt_last = t.last.clone().unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Time span:{}", CYAN, RESET);
    println!("    from: {}", fmt_first);
    println!("    to:   {}", fmt_last);

    //
    // 4) AVERAGE EVENTS/SESSION
    //
    if t.sessions > 0 {
        let avg = t.events as f64 / t.sessions as f64;
        println!("{}• Average events/session:{} {:.2}", CYAN, RESET, avg);
    }

    if let (Some(f), Some(l)) = (&t.first, &t.last)
        && let (Ok(f), Ok(l)) = (iso_to_millis(f), iso_to_millis(l))
    {
        let hours = ((l - f) as f64 / 3_600_000.0).max(0.0);
        println!("{}• Hours covered:{} {:.1}", CYAN, RESET, hours);
    }

    println!();
    Ok(())
}
