//! Shared default values for the command-line front-end.

/// Configuration file written by `init` and read by `--config`.
pub const CONFIG_FILE: &str = "popsynth.json";

/// Log filter used when neither `RUST_LOG` nor `--log-level` is set.
pub const LOG_FILTER: &str = "popsynth=info,popsynth_sim=info";

pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}";
pub const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {pos} objects {per_sec}";
