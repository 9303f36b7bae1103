use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Upper bound on worker threads, regardless of what was requested.
pub const MAX_WORKERS: usize = 61;

/// Frames handed to the checksum engine per decoded block.
pub const DEFAULT_BLOCK_FRAMES: usize = 65536;

pub const DEFAULT_QUARANTINE_DIR: &str = "_flac_toolkit_quarantine";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub root_paths: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub workers: Option<usize>,
    pub block_frames: usize,
    pub quarantine_dir_name: String,
    pub padding: PaddingPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_paths: Vec::new(),
            ignore_patterns: Vec::new(),
            workers: None,
            block_frames: DEFAULT_BLOCK_FRAMES,
            quarantine_dir_name: DEFAULT_QUARANTINE_DIR.to_string(),
            padding: PaddingPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn with_root_paths(mut self, paths: Vec<String>) -> Self {
        self.root_paths = paths;
        self
    }

    /// Worker count after clamping into `1..=MAX_WORKERS`.
    /// Unset falls back to the machine's available parallelism.
    pub fn effective_workers(&self) -> usize {
        let requested = self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        clamp_workers(requested)
    }
}

/// Largest padding block tolerated before it is treated as corruption.
///
/// The threshold follows the file's declared bit depth: 16-bit (and below) content
/// uses `standard_max_bytes`, anything wider uses `hires_max_bytes`. When the bit
/// depth cannot be read the stricter standard threshold applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaddingPolicy {
    pub standard_max_bytes: u32,
    pub hires_max_bytes: u32,
}

impl Default for PaddingPolicy {
    fn default() -> Self {
        Self {
            standard_max_bytes: 128 * 1024,
            hires_max_bytes: 16 * 1024 * 1024,
        }
    }
}

impl PaddingPolicy {
    pub fn threshold_for(&self, bits_per_sample: Option<u32>) -> u32 {
        match bits_per_sample {
            Some(bits) if bits > 16 => self.hires_max_bytes,
            _ => self.standard_max_bytes,
        }
    }
}

pub fn clamp_workers(requested: usize) -> usize {
    if requested > MAX_WORKERS {
        warn!(
            "Requested {} workers exceeds system limit. Capping at {}.",
            requested, MAX_WORKERS
        );
        MAX_WORKERS
    } else if requested == 0 {
        warn!("Requested 0 workers, using 1");
        1
    } else {
        requested
    }
}

/// Loads `Config.toml` (optional) layered under `FLACSIFT__*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("FLACSIFT").separator("__"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Remove directories that are subdirectories of other directories in the list.
/// A parent listed after its children replaces all of them.
pub fn non_overlapping_directories(dirs: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();

    for dir in dirs {
        let dir_path = Path::new(&dir);
        if result
            .iter()
            .any(|res_dir| dir_path.starts_with(Path::new(res_dir)))
        {
            continue;
        }
        result.retain(|res_dir| !Path::new(res_dir).starts_with(dir_path));
        result.push(dir);
    }

    result
}
