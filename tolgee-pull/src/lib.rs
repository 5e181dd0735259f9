#![forbid(unsafe_code)]
//! Converts Tolgee JSON exports into files client apps consume.
//!
//! An export is a set of catalogs (one JSON object per locale). Each catalog is
//! turned into either a pretty-printed JSON file or an Android `strings.xml`
//! resource document.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tolgee_pull::{ExtractedExport, OutputFormat, Pipeline, pull};
//!
//! let pipeline = Pipeline::new("i18n", OutputFormat::AndroidStrings);
//! let report = pull(&ExtractedExport::new("export"), &pipeline)?;
//! for path in &report.written {
//!     println!("{}", path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Output Formats
//!
//! - **JSON**: nulls become empty strings, everything else is kept verbatim.
//! - **Android `strings.xml`**: top-level string values only; entities decoded,
//!   quotes and newlines escaped, markup kept in CDATA, `formatted="false"` on
//!   values with several placeholders.

pub mod error;
pub mod export;
pub mod formats;
pub mod normalize;
pub mod pipeline;
pub mod sanitize;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    export::{ExportSource, ExtractedExport, pull},
    formats::OutputFormat,
    pipeline::{FileDescriptor, FileFailure, FileStage, Pipeline, TransformReport},
    types::{Catalog, Value},
};
