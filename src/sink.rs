//! Output destinations for a composed document: any [Write] implementation,
//! a file path, or an in-memory [Artifact] ready to be handed to a download
//! response.

use crate::assembler::{Assembler, Report};
use crate::config::LayoutConfig;
use crate::error::{ComposeError, Result};
use crate::measure::Measure;
use crate::model::Document;
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Compose `document` and write it to `sink`, returning once the sink has
/// been flushed
pub fn compose_to_writer<M, W>(
    document: &Document,
    config: &LayoutConfig,
    measurer: &M,
    sink: W,
) -> Result<Report>
where
    M: Measure + ?Sized,
    W: Write,
{
    Assembler::new(measurer, config.clone()).compose_to_writer(document, sink)
}

/// Compose `document` into the file at `path`.
///
/// The document is written to `<path>.partial` first, synced, and then
/// renamed into place, so `path` only ever holds a complete document. If
/// anything fails the partial file is removed.
pub fn compose_to_path<M, P>(
    document: &Document,
    config: &LayoutConfig,
    measurer: &M,
    path: P,
) -> Result<Report>
where
    M: Measure + ?Sized,
    P: AsRef<Path>,
{
    let target = path.as_ref();
    let mut partial = PartialFile::create(target)?;
    let report = compose_to_writer(document, config, measurer, partial.file()?)
        .map_err(|e| with_path(e, target))?;
    partial.commit()?;
    log::debug!("wrote {}", target.display());
    Ok(report)
}

/// Compose `document` into memory
pub fn compose_to_artifact<M>(
    document: &Document,
    config: &LayoutConfig,
    measurer: &M,
) -> Result<(Artifact, Report)>
where
    M: Measure + ?Sized,
{
    let mut bytes = Vec::new();
    let report = compose_to_writer(document, config, measurer, &mut bytes)?;
    let artifact = Artifact {
        filename: Artifact::filename_for(document.created),
        bytes,
    };
    Ok((artifact, report))
}

/// A finished document held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested download file name
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// `brand-kit-<unix millis>.pdf`
    pub fn filename_for(created: DateTime<Utc>) -> String {
        format!("brand-kit-{}.pdf", created.timestamp_millis())
    }

    pub fn content_length(&self) -> usize {
        self.bytes.len()
    }

    pub fn content_type(&self) -> &'static str {
        "application/pdf"
    }
}

fn with_path(error: ComposeError, target: &Path) -> ComposeError {
    match error {
        ComposeError::SinkWriteFailure { path: None, source } => ComposeError::SinkWriteFailure {
            path: Some(target.to_path_buf()),
            source,
        },
        other => other,
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    target.with_file_name(name)
}

/// A file being written next to its final destination. Dropping it without
/// calling [PartialFile::commit] deletes it.
struct PartialFile {
    path: PathBuf,
    target: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl PartialFile {
    fn create(target: &Path) -> Result<PartialFile> {
        let path = partial_path(target);
        let file =
            File::create(&path).map_err(|e| ComposeError::sink(Some(target.to_path_buf()), e))?;
        Ok(PartialFile {
            path,
            target: target.to_path_buf(),
            file: Some(file),
            committed: false,
        })
    }

    fn file(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or_else(|| {
            ComposeError::sink(
                Some(self.target.clone()),
                std::io::Error::other("output file already closed"),
            )
        })
    }

    fn commit(mut self) -> Result<()> {
        let sink_error = |e| ComposeError::sink(Some(self.target.clone()), e);
        if let Some(file) = self.file.take() {
            file.sync_all().map_err(sink_error)?;
        }
        fs::rename(&self.path, &self.target).map_err(sink_error)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        // close before removing
        self.file.take();
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.path) {
                log::warn!("failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}
