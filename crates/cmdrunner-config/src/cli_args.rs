use std::path::PathBuf;

/// Overrides collected from the command line.
///
/// `None` means "not given"; discovery then falls back to environment, file
/// and defaults in that order.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file (skips upward discovery)
    pub config_path: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub encoding: Option<String>,
    pub shell: Option<String>,
    pub verbose: Option<bool>,
}
