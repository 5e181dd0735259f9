//! All error types for the tolgee-pull crate.
//!
//! These are returned from all fallible operations (reading exports, parsing catalogs,
//! writing resource files, etc.). Per-file failures inside a batch are wrapped in
//! [`crate::pipeline::FileFailure`] instead of being returned.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("output path `{}` is claimed by another file in this batch", path.display())]
    OutputCollision { path: PathBuf },
}
