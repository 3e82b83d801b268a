//! Trackify main entrypoint.

use trackify::run;
use trackify::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
