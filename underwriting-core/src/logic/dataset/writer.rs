use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::corpus::{CorpusLine, TrainingCorpus};

/// Writes training corpora as JSONL, one file per export
pub struct DatasetWriter {
    base_dir: PathBuf,
}

impl DatasetWriter {
    pub fn new() -> Self {
        Self::from_path(super::get_dataset_dir())
    }

    pub fn from_path(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Export every row of `corpus`; returns the written file
    pub fn write_corpus(&self, corpus: &TrainingCorpus) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.base_dir)?;

        let path = self.new_file_path();
        let file = self.create_file(&path)?;
        let mut out = BufWriter::new(file);

        for (index, (record, label)) in corpus.records().enumerate() {
            let json = serde_json::to_string(&CorpusLine::new(index, &record, label))?;
            writeln!(out, "{}", json)?;
        }
        out.flush()?;

        log::info!("Exported {} corpus rows to {}", corpus.len(), path.display());
        Ok(path)
    }

    /// Number of exported files and their total size in MB
    pub fn get_stats(&self) -> io::Result<(usize, f32)> {
        let mut count = 0;
        let mut size = 0u64;

        for entry in fs::read_dir(&self.base_dir)?.flatten() {
            let path = entry.path();
            if path.extension().map_or(false, |e| e == "jsonl") {
                count += 1;
                if let Ok(meta) = entry.metadata() {
                    size += meta.len();
                }
            }
        }

        Ok((count, size as f32 / 1024.0 / 1024.0))
    }

    fn new_file_path(&self) -> PathBuf {
        // timestamp format: YYYY-MM-DD-HHMMSS.mmm
        let now = Utc::now();
        let filename = format!("corpus-{}.jsonl", now.format("%Y-%m-%d-%H%M%S%.3f"));
        self.base_dir.join(filename)
    }

    fn create_file(&self, path: &Path) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
    }
}

impl Default for DatasetWriter {
    fn default() -> Self {
        Self::new()
    }
}
