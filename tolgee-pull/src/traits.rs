//! Traits shared by the catalog model and the output formats.

use std::{
    fs::File,
    io::{BufRead, BufReader, Cursor, Write},
    path::Path,
};

use crate::error::Error;

/// Reading and writing one document (an export catalog or a rendered resource file).
///
/// # Example
///
/// ```rust,no_run
/// use tolgee_pull::{Catalog, traits::Parser};
/// let catalog = Catalog::read_from("export/en.json")?;
/// println!("{} keys", catalog.len());
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Render into an in-memory UTF-8 string.
    fn render(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        String::from_utf8(out).map_err(|e| Error::InvalidResource(e.to_string()))
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}
