//! Export of derived records.
//!
//! The bulk export bundles every XML record and every rendered barcode into one
//! ZIP archive. Rendering runs on the blocking thread pool, one task per
//! eligible row, and results are collected in row order. A row whose artifact
//! cannot be produced is reported and skipped; only a failure to build the
//! archive itself fails the export.

mod archive;

pub use archive::{ArchiveBuilder, EntryNames};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::common::{Error, Result};
use crate::pipeline::session::Session;
use crate::render::BarcodeRenderer;

/// Why a row's artifact is missing from an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The row has no valid barcode payload
    Ineligible,
    /// The renderer failed for this row
    RenderFailed(String),
    /// The row's XML record could not be serialized
    XmlUnavailable,
}

/// One artifact left out of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArtifact {
    pub row: usize,
    pub wi_number: String,
    pub reason: SkipReason,
}

/// Summary of an export run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub xml_files: usize,
    pub barcode_files: usize,
    pub skipped: Vec<SkippedArtifact>,
}

impl ExportReport {
    /// Rows whose barcode could not be rendered.
    pub fn render_failures(&self) -> impl Iterator<Item = &SkippedArtifact> {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::RenderFailed(_)))
    }
}

/// A finished archive and its report.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub archive_name: String,
    pub bytes: Vec<u8>,
    pub report: ExportReport,
}

impl ExportBundle {
    /// Write the archive into `dir` under its archive name.
    pub async fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.archive_name);
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|e| Error::Archive(format!("failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Bundle every XML record and rendered barcode of `session` into one archive.
pub async fn export_archive(
    session: &Session,
    renderer: Arc<dyn BarcodeRenderer>,
) -> Result<ExportBundle> {
    let mut report = ExportReport::default();
    let mut archive = ArchiveBuilder::new();

    for (row, record) in session.xml_records().iter().enumerate() {
        match &record.xml {
            Some(xml) => {
                archive.add_file(&record.file_name(), xml.as_bytes())?;
                report.xml_files += 1;
            },
            None => report.skipped.push(SkippedArtifact {
                row,
                wi_number: record.wi_number.clone(),
                reason: SkipReason::XmlUnavailable,
            }),
        }
    }

    let mut pending = Vec::new();
    for record in session.barcode_records() {
        let (Some(payload), Some(name)) = (
            record.payload.clone(),
            record.file_name_with_extension(renderer.extension()),
        ) else {
            report.skipped.push(SkippedArtifact {
                row: record.row_index,
                wi_number: record.wi_number.clone(),
                reason: SkipReason::Ineligible,
            });
            continue;
        };
        let renderer = Arc::clone(&renderer);
        let task = tokio::task::spawn_blocking(move || renderer.render(&payload));
        pending.push((record.row_index, record.wi_number.clone(), name, task));
    }

    for (row, wi_number, name, task) in pending {
        let rendered = match task.await {
            Ok(result) => result,
            Err(join_err) => Err(Error::from(join_err)),
        };
        match rendered {
            Ok(bytes) => {
                archive.add_file(&name, &bytes)?;
                report.barcode_files += 1;
            },
            Err(err) => {
                warn!(row, wi_number = %wi_number, error = %err, "barcode rendering failed, row skipped");
                report.skipped.push(SkippedArtifact {
                    row,
                    wi_number,
                    reason: SkipReason::RenderFailed(err.to_string()),
                });
            },
        }
    }

    let bytes = archive
        .finish()
        .map_err(|e| Error::Archive(format!("failed to finalize archive: {}", e)))?;
    info!(
        xml = report.xml_files,
        barcodes = report.barcode_files,
        skipped = report.skipped.len(),
        "export archive built"
    );

    Ok(ExportBundle {
        archive_name: session.config().archive_name.clone(),
        bytes,
        report,
    })
}

/// Render the barcode of row `index`; returns the file name and bytes.
pub fn render_barcode(
    session: &Session,
    index: usize,
    renderer: &dyn BarcodeRenderer,
) -> Result<(String, Vec<u8>)> {
    let record = session
        .barcode_records()
        .get(index)
        .ok_or(Error::RowOutOfRange {
            index,
            len: session.len(),
        })?;
    let (Some(payload), Some(name)) = (
        &record.payload,
        record.file_name_with_extension(renderer.extension()),
    ) else {
        return Err(Error::Render(format!(
            "row {} ({}) has no valid barcode data",
            index, record.wi_number
        )));
    };
    Ok((name, renderer.render(payload)?))
}

/// Write every XML record of `session` into `dir` as a loose file.
///
/// Returns the paths written. Rows sharing a `Wi_Number` get suffixed names
/// the same way archive entries do; existing files in `dir` are replaced.
pub async fn write_xml_files<P: AsRef<Path>>(session: &Session, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let mut names = EntryNames::new();
    let mut written = Vec::with_capacity(session.len());
    for (row, record) in session.xml_records().iter().enumerate() {
        let Some(xml) = &record.xml else {
            warn!(row, wi_number = %record.wi_number, "no XML record, file skipped");
            continue;
        };
        let path = dir.join(names.claim(&record.file_name()));
        tokio::fs::write(&path, xml).await?;
        written.push(path);
    }
    Ok(written)
}
