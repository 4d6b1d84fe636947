//! Commit and date baked in by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// One-line version string for the simulator's `--version`.
pub fn version_line() -> String {
    format!(
        "ascend {} ({} built {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_COMMIT,
        BUILD_DATE
    )
}
