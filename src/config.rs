use std::path::{Path, PathBuf};

const DEFAULT_DB_PATH: &str = "database/ewf.db";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_FILE: &str = "ewf_terminal.log";

pub const MATCHES_FILE: &str = "ewf_matches.csv";
pub const APPEARANCES_FILE: &str = "ewf_appearances.csv";
pub const STANDINGS_FILE: &str = "ewf_standings.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
    pub log_path: PathBuf,
}

/// Locations of the three delimited source files consumed by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFiles {
    pub matches: PathBuf,
    pub appearances: PathBuf,
    pub standings: PathBuf,
}

impl SourceFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            matches: dir.join(MATCHES_FILE),
            appearances: dir.join(APPEARANCES_FILE),
            standings: dir.join(STANDINGS_FILE),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Resolves settings from `.env.local`, `.env`, the process environment
    /// and finally the command line, later sources winning.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::from_env().with_args(&args)
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(path) = env_path("EWF_DB_PATH") {
            cfg.db_path = path;
        }
        if let Some(path) = env_path("EWF_DATA_DIR") {
            cfg.data_dir = path;
        }
        if let Some(path) = env_path("EWF_LOG_FILE") {
            cfg.log_path = path;
        }
        cfg
    }

    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(path) = arg_value(args, "--db") {
            self.db_path = PathBuf::from(path);
        }
        if let Some(path) = arg_value(args, "--data-dir") {
            self.data_dir = PathBuf::from(path);
        }
        if let Some(path) = arg_value(args, "--log-file") {
            self.log_path = PathBuf::from(path);
        }
        self
    }

    pub fn sources(&self) -> SourceFiles {
        SourceFiles::in_dir(&self.data_dir)
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

/// Reads `--name value` or `--name=value`, ignoring blank values.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}
