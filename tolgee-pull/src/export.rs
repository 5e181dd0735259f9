//! Where exported catalog files come from.
//!
//! Downloading the export archive and unpacking it happen outside this crate;
//! an [`ExportSource`] only has to say which catalog files are there.
//! [`ExtractedExport`] covers the usual case of an archive that was already
//! unpacked into a directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    pipeline::{FileDescriptor, Pipeline, TransformReport},
};

const CATALOG_EXTENSION: &str = "json";

/// Supplies the catalog files of one export.
pub trait ExportSource {
    fn files(&self) -> Result<Vec<FileDescriptor>, Error>;
}

impl ExportSource for Vec<FileDescriptor> {
    fn files(&self) -> Result<Vec<FileDescriptor>, Error> {
        Ok(self.clone())
    }
}

/// An export archive unpacked into `root`.
///
/// Top-level `*.json` files are named after their stem (`en.json` -> `en`).
/// Files one directory down (namespaced exports) are named `<dir>/<stem>`.
#[derive(Debug, Clone)]
pub struct ExtractedExport {
    root: PathBuf,
}

impl ExtractedExport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ExportSource for ExtractedExport {
    fn files(&self) -> Result<Vec<FileDescriptor>, Error> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_dir() {
                let namespace = file_name(&path);
                for sub_entry in fs::read_dir(&path)? {
                    let sub_path = sub_entry?.path();
                    if let Some(stem) = catalog_stem(&sub_path) {
                        files.push(FileDescriptor::new(
                            format!("{}/{}", namespace, stem),
                            sub_path,
                        ));
                    }
                }
            } else if let Some(stem) = catalog_stem(&path) {
                files.push(FileDescriptor::new(stem, path));
            }
        }

        // read_dir order is platform dependent
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn catalog_stem(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let is_catalog = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CATALOG_EXTENSION));
    if !is_catalog {
        return None;
    }
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// Lists the files of an export and converts them.
///
/// Failing to list the export aborts before any file is touched; failures of
/// single files are reported in the returned [`TransformReport`].
pub fn pull<S: ExportSource + ?Sized>(
    source: &S,
    pipeline: &Pipeline,
) -> Result<TransformReport, Error> {
    let files = source.files()?;
    tracing::info!(
        files = files.len(),
        format = %pipeline.format(),
        output_dir = %pipeline.output_dir().display(),
        "converting export"
    );
    pipeline.run(&files)
}
