//! Embeds the commit hash and build date for `simulate --version`.

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

const UNKNOWN: &str = "unknown";

/// Short commit from `BUILD_COMMIT` or `git rev-parse`. Anything that is not a
/// plausible hash (no git, not a checkout, empty output) becomes "unknown".
fn commit() -> String {
    let raw = env::var("BUILD_COMMIT").ok().or_else(|| {
        Command::new("git")
            .args(["rev-parse", "--short=7", "HEAD"])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
    });
    match raw.map(|s| s.trim().to_string()) {
        Some(hash) if hash.len() == 7 && hash.chars().all(|c| c.is_ascii_hexdigit()) => hash,
        _ => UNKNOWN.to_string(),
    }
}

/// `BUILD_DATE` when it is a valid `YYYY-MM-DD`, otherwise today.
fn date() -> String {
    env::var("BUILD_DATE")
        .ok()
        .filter(|d| chrono::NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").is_ok())
        .map(|d| d.trim().to_string())
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string())
}

fn main() {
    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("build_info.rs");

    fs::write(
        &dest_path,
        format!(
            "pub const BUILD_COMMIT: &str = {:?};\npub const BUILD_DATE: &str = {:?};\n",
            commit(),
            date()
        ),
    )
    .expect("write build_info.rs");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=BUILD_DATE");
}
