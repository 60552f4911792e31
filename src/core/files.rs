//! Data directory layout and small file helpers.

use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

/// Default location: `<platform data dir>/daily-proj`, falling back to
/// `~/.local/share/daily-proj` and finally the working directory.
pub fn default_data_dir() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".local");
        home.push("share");
        home
    });
    base.join("daily-proj")
}

/// Fixed file names inside a data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database(&self) -> PathBuf {
        self.root.join("history.db")
    }

    pub fn config(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn patterns(&self) -> PathBuf {
        self.root.join("patterns.json")
    }

    pub fn team_ceilings(&self) -> PathBuf {
        self.root.join("team_ceilings.json")
    }
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}
