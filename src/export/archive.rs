//! ZIP packaging of exported files.

use std::collections::HashSet;
use std::io::{Cursor, Seek, Write};

use tracing::warn;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::common::Result;

/// Set of file names already handed out for one export.
///
/// A name that was already used gets a numeric suffix before its extension
/// (`W1.xml`, `W1_2.xml`, ...).
#[derive(Debug, Clone, Default)]
pub struct EntryNames {
    names: HashSet<String>,
}

impl EntryNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name`, or the first free suffixed variant of it.
    pub fn claim(&mut self, name: &str) -> String {
        let entry = self.unique_name(name);
        if entry != name {
            warn!(requested = name, used = %entry, "duplicate file name renamed");
        }
        self.names.insert(entry.clone());
        entry
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.names.contains(name) {
            return name.to_string();
        }
        let (stem, ext) = match name.rfind('.') {
            Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
            _ => (name, ""),
        };
        (2..)
            .map(|n| format!("{}_{}{}", stem, n, ext))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

/// Builder for the export archive.
///
/// Entry names are kept unique through [`EntryNames`].
///
/// # Examples
///
/// ```
/// # use bindline::export::ArchiveBuilder;
/// # fn example() -> bindline::Result<()> {
/// let mut archive = ArchiveBuilder::new();
/// archive.add_file("W1.xml", b"<csv/>")?;
/// let bytes = archive.finish()?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct ArchiveBuilder<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    names: EntryNames,
}

impl ArchiveBuilder<Cursor<Vec<u8>>> {
    /// Create a new archive builder that writes to memory
    pub fn new() -> Self {
        Self::with_writer(Cursor::new(Vec::new()))
    }

    /// Finalize the archive and return its bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(self.zip_writer.finish()?.into_inner())
    }
}

impl Default for ArchiveBuilder<Cursor<Vec<u8>>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Seek> ArchiveBuilder<W> {
    /// Create a new archive builder with a custom writer
    pub fn with_writer(writer: W) -> Self {
        Self {
            zip_writer: ZipWriter::new(writer),
            names: EntryNames::new(),
        }
    }

    /// Add a file; returns the entry name actually used.
    pub fn add_file(&mut self, name: &str, content: &[u8]) -> Result<String> {
        let entry = self.names.claim(name);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip_writer.start_file(entry.as_str(), options)?;
        self.zip_writer.write_all(content)?;
        Ok(entry)
    }

    /// Number of entries added so far
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
