#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// `trackify` bound to a private home (config, session file) with colours off.
pub fn trk(home: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("trackify");
    cmd.env("TRACKIFY_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("TRACKIFY_LOG");
    cmd
}

/// Fresh per-test home directory inside the system temp dir
pub fn setup_home(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_trackify_home", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create test home");
    path.to_string_lossy().to_string()
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_trackify.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Home + initialized DB, ready for recording.
pub fn init_env(name: &str) -> (String, String) {
    let home = setup_home(name);
    let db_path = setup_test_db(name);
    trk(&home)
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    (home, db_path)
}

/// Record a small storefront session through the CLI.
pub fn record_sample(home: &str, db_path: &str) {
    let events: [(&str, &str); 5] = [
        ("product_view", r#"{"productId":"p1","productName":"Desk Lamp","price":39.9}"#),
        ("product_view", r#"{"productId":"p1","productName":"Desk Lamp","price":39.9}"#),
        ("product_view", r#"{"productId":"p2","productName":"Oak Chair"}"#),
        ("add_to_cart", r#"{"productId":"p1","productName":"Desk Lamp","quantity":1}"#),
        ("search", r#"{"searchTerm":"lamp","resultsCount":4}"#),
    ];
    for (kind, data) in events {
        trk(home)
            .args(["--db", db_path, "track", kind, "--data", data, "--page", "/products"])
            .assert()
            .success();
    }
}

/// Stdout of a finished command with ANSI styling removed.
pub fn plain_stdout(out: &std::process::Output) -> String {
    let re = regex::Regex::new(r"\x1B\[[0-9;]*[mK]").expect("ansi regex");
    re.replace_all(&String::from_utf8_lossy(&out.stdout), "").into_owned()
}
