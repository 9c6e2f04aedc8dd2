#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ewf_terminal::config::{APPEARANCES_FILE, MATCHES_FILE, STANDINGS_FILE, SourceFiles};
use ewf_terminal::loader::{self, BootstrapOutcome};
use ewf_terminal::queries::Dataset;
use tempfile::TempDir;

pub const SEASON_WSL: &str = "S-2019-2020-1";
pub const SEASON_CHAMPIONSHIP: &str = "S-2018-2019-2";

pub fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

/// Copies the fixture CSVs into a fresh directory so a test can break one.
pub fn copy_fixtures(dir: &Path) -> SourceFiles {
    let data_dir = dir.join("data");
    fs::create_dir_all(&data_dir).expect("data dir should be creatable");
    for name in [MATCHES_FILE, APPEARANCES_FILE, STANDINGS_FILE] {
        fs::copy(fixtures_dir().join(name), data_dir.join(name))
            .expect("fixture file should be copyable");
    }
    SourceFiles::in_dir(&data_dir)
}

pub struct Loaded {
    pub dir: TempDir,
    pub db_path: PathBuf,
    pub dataset: Dataset,
}

pub fn loaded_dataset() -> Loaded {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("database").join("ewf.db");
    let sources = SourceFiles::in_dir(&fixtures_dir());
    let outcome = loader::bootstrap(&db_path, &sources).expect("bootstrap should succeed");
    assert!(matches!(outcome, BootstrapOutcome::Loaded(_)));
    let dataset = Dataset::open(&db_path).expect("dataset should open");
    Loaded {
        dir,
        db_path,
        dataset,
    }
}
