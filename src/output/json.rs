//! JSON corpus export
//!
//! The corpus is written as a JSON array of `{url, text}` objects, the
//! hand-off format for downstream topic modeling.

use crate::output::traits::{CrawlReport, OutputHandler, OutputResult};
use crate::state::CorpusEntry;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the corpus to a fixed path
#[derive(Debug, Clone)]
pub struct JsonCorpus {
    path: PathBuf,
}

impl JsonCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for JsonCorpus {
    fn write(&self, report: &CrawlReport) -> OutputResult<String> {
        write_corpus_json(&report.corpus, &self.path)?;
        Ok(format!(
            "{} document(s) exported to {}",
            report.corpus.len(),
            self.path.display()
        ))
    }
}

/// Serializes the corpus as pretty-printed JSON
pub fn write_corpus_json(corpus: &[CorpusEntry], output_path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, corpus)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads a corpus previously written by [`write_corpus_json`]
pub fn read_corpus_json(input_path: &Path) -> OutputResult<Vec<CorpusEntry>> {
    let content = std::fs::read_to_string(input_path)?;
    Ok(serde_json::from_str(&content)?)
}
