// src/history/mod.rs

use anyhow::{Context, Result};
use chrono::Utc;
use glob::glob;
use std::{
    collections::HashSet,
    fs,
    path::PathBuf,
};

/// Marker-file store recording which filings a run has already handled.
/// One empty file per event, named `<tracing_no>_<event>_<ts>.marker`.
pub struct History {
    history_dir: PathBuf,
}

impl History {
    /// Construct a new History store at `history_dir`, creating the directory if needed.
    pub fn new(history_dir: impl Into<PathBuf>) -> Result<Self> {
        let history_dir = history_dir.into();
        fs::create_dir_all(&history_dir)
            .with_context(|| format!("creating history directory {:?}", &history_dir))?;
        Ok(Self { history_dir })
    }

    /// Record an event for `tracing_no` (e.g. "processed").
    pub fn record_event(&self, tracing_no: &str, event: &str) -> Result<()> {
        let ts = Utc::now().timestamp_micros();
        let filename = format!("{}_{}_{}.marker", tracing_no, event, ts);
        let path = self.history_dir.join(filename);
        fs::write(&path, "").with_context(|| format!("writing history marker {:?}", &path))?;
        Ok(())
    }

    /// Load all distinct tracing numbers for the given `event` by scanning
    /// filenames.
    pub fn load_event_names(&self, event: &str) -> Result<HashSet<String>> {
        let mut set = HashSet::new();
        let pattern = format!("{}/*_{}_*.marker", self.history_dir.display(), event);
        for entry in glob(&pattern)? {
            if let Ok(path) = entry {
                if let Some(fname) = path.file_stem().and_then(|s| s.to_str()) {
                    // fname = "<tracing_no>_<event>_<ts>"
                    if let Some(idx) = fname.rfind(&format!("_{}_", event)) {
                        set.insert(fname[..idx].to_string());
                    }
                }
            }
        }
        Ok(set)
    }
}
