//! Pretty-printed JSON output.
//!
//! Values pass through unchanged except that nulls become empty strings and
//! whole-number floats are written as integers (`1.0` as `1`). The document
//! uses two-space indentation and ends with a newline.

use std::io::{BufRead, Write};

use crate::{
    error::Error,
    normalize::normalize_catalog,
    traits::Parser,
    types::Catalog,
};

/// A normalized catalog ready to be written as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    pub catalog: Catalog,
}

impl From<&Catalog> for Format {
    fn from(value: &Catalog) -> Self {
        Self {
            catalog: normalize_catalog(value),
        }
    }
}

impl Parser for Format {
    /// Parse from any reader. Nulls in the input are normalized away.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let catalog = Catalog::from_reader(reader)?;
        Ok(Format::from(&catalog))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, &self.catalog)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
