//! Analysis configuration management.
//!
//! Provides configuration loading, the global verbose flag, and the
//! threshold table consulted by every analyzer and the enhancement planner.

mod defaults;

pub use defaults::AnalysisDefaults;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

use serde::Deserialize;

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["lineprep.yml", "lineprep.yaml"];

/// Public handle that stores the loaded configuration, its source path, and warnings.
pub struct AnalysisConfigHandle {
    pub config: AnalysisConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl AnalysisConfigHandle {
    fn with_config(config: AnalysisConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Complete configuration file structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub defaults: AnalysisDefaults,
}

impl AnalysisConfig {
    fn sanitize(mut self) -> Self {
        self.defaults.sanitize();
        self
    }
}

/// Load configuration from disk, optionally forcing a specific path.
///
/// Falls back to built-in defaults when no config file is found; parse and
/// read failures are collected as warnings rather than hard errors.
pub fn load_config(custom_path: Option<&Path>) -> AnalysisConfigHandle {
    let mut warnings = Vec::new();
    let candidates = get_config_candidates(custom_path);

    for candidate in candidates {
        if !candidate.exists() || !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<AnalysisConfig>(&contents) {
                Ok(config) => {
                    let sanitized = config.sanitize();
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return AnalysisConfigHandle::with_config(sanitized, Some(source), warnings);
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No config file found; using built-in defaults.".to_string());
    AnalysisConfigHandle::with_config(AnalysisConfig::default(), None, warnings)
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var("LINEPREP_CONFIG") {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("lineprep").join(name));
        }
    }

    candidates
}

static ANALYSIS_CONFIG_HANDLE: OnceLock<AnalysisConfigHandle> = OnceLock::new();
static PRINT_CONFIG_ONCE: Once = Once::new();

/// Access the global analysis configuration (loaded once per process).
pub fn config_handle() -> &'static AnalysisConfigHandle {
    ANALYSIS_CONFIG_HANDLE.get_or_init(|| load_config(None))
}

/// Print config source and warnings the first time it is requested (only in verbose mode).
pub fn log_config_usage() {
    PRINT_CONFIG_ONCE.call_once(|| {
        if !is_verbose() {
            return;
        }
        let handle = config_handle();
        if let Some(source) = &handle.source {
            eprintln!("[lineprep] Loaded config from {}", source.display());
        } else {
            eprintln!("[lineprep] Using built-in defaults");
        }

        for warning in &handle.warnings {
            eprintln!("[lineprep] Config warning: {}", warning);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let defaults = AnalysisDefaults::default();
        assert_eq!(defaults.luminance_grid_size, 8);
        assert_eq!(defaults.blur_standard_width, 512);
        assert!(defaults.gamma_low_mean < defaults.gamma_high_mean);
        assert!(defaults.resize_target_min <= defaults.resize_target_max);
    }

    #[test]
    fn test_sanitize_clamps_out_of_range_values() {
        let mut defaults = AnalysisDefaults {
            luminance_cell_threshold: 3.0,
            luminance_grid_size: 0,
            blur_block_blurry_ratio: -1.0,
            contrast_very_low: 90.0,
            resize_target_max: 10,
            resize_target_min: 512,
            ..AnalysisDefaults::default()
        };
        defaults.sanitize();

        assert!(defaults.luminance_cell_threshold <= 1.0);
        assert!(defaults.luminance_grid_size >= 1);
        assert!(defaults.blur_block_blurry_ratio >= 0.0);
        assert!(defaults.contrast_very_low <= defaults.contrast_threshold);
        assert!(defaults.resize_target_max >= defaults.resize_target_min);
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let handle = load_config(Some(Path::new("/nonexistent/lineprep.yml")));
        assert!(handle.source.is_none());
        assert!(!handle.warnings.is_empty());
        assert_eq!(handle.config.defaults.luminance_grid_size, 8);
    }
}
