//! Batch conversion of exported catalog files.
//!
//! Every file goes through the same steps:
//!
//! ```text
//! Pending -> Read -> Parsed -> Transformed -> Written -> SourceRemoved -> Done
//!                \________\___________\___________\___________\-> Failed(stage)
//! ```
//!
//! A failing file is logged and recorded in the [`TransformReport`]; the
//! remaining files are still processed. Nothing is retried.

use std::{
    collections::HashSet,
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    formats::OutputFormat,
    traits::Parser,
    types::Catalog,
};

/// One exported catalog file, as handed over by an export source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Logical catalog name (locale or file base name, optionally `dir/name`).
    pub name: String,
    /// Where the raw export file lives. Removed after a successful conversion.
    pub path: PathBuf,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// The step at which a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Read,
    Parse,
    Transform,
    Collision,
    Write,
    RemoveSource,
}

impl Display for FileStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            FileStage::Read => "read",
            FileStage::Parse => "parse",
            FileStage::Transform => "transform",
            FileStage::Collision => "collision",
            FileStage::Write => "write",
            FileStage::RemoveSource => "remove source",
        };
        write!(f, "{}", stage)
    }
}

/// A file that could not be converted.
#[derive(Debug)]
pub struct FileFailure {
    pub name: String,
    pub stage: FileStage,
    pub error: Error,
}

impl Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} failed): {}", self.name, self.stage, self.error)
    }
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct TransformReport {
    /// Output files written, in input order.
    pub written: Vec<PathBuf>,
    /// Files that failed, in input order.
    pub failures: Vec<FileFailure>,
}

impl TransformReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Converts exported catalog files into one output format.
#[derive(Debug, Clone)]
pub struct Pipeline {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl Pipeline {
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Output location for a file: `<output_dir>/<base name>.<extension>`.
    ///
    /// The base name is the logical name without directories or extension,
    /// falling back to the source file name when the logical name has none.
    pub fn output_path(&self, file: &FileDescriptor) -> PathBuf {
        let stem = Path::new(&file.name)
            .file_stem()
            .or_else(|| file.path.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.name.clone());
        self.output_dir
            .join(format!("{}.{}", stem, self.format.extension()))
    }

    /// Converts every file and reports what was written and what failed.
    ///
    /// Only a missing output directory that cannot be created aborts the batch;
    /// all per-file problems end up in [`TransformReport::failures`].
    ///
    /// Output paths are assigned before any file is read. A file fails with
    /// [`FileStage::Collision`] when its output path was already assigned to an
    /// earlier file, or is the source of another file in the batch.
    pub fn run(&self, files: &[FileDescriptor]) -> Result<TransformReport, Error> {
        fs::create_dir_all(&self.output_dir)?;

        let sources: Vec<PathBuf> = files.iter().map(|file| resolve(&file.path)).collect();
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut report = TransformReport::default();

        for (position, file) in files.iter().enumerate() {
            let output_path = self.output_path(file);
            let target = resolve(&output_path);
            let overwrites_other_source = sources
                .iter()
                .enumerate()
                .any(|(other, source)| other != position && *source == target);

            let result = if overwrites_other_source || !claimed.insert(target) {
                Err((
                    FileStage::Collision,
                    Error::OutputCollision { path: output_path },
                ))
            } else {
                self.process(file, output_path)
            };

            match result {
                Ok(output_path) => {
                    tracing::info!(
                        file = %file.name,
                        output = %output_path.display(),
                        "converted catalog"
                    );
                    report.written.push(output_path);
                }
                Err((stage, error)) => {
                    tracing::warn!(
                        file = %file.name,
                        %stage,
                        %error,
                        "failed to convert catalog"
                    );
                    report.failures.push(FileFailure {
                        name: file.name.clone(),
                        stage,
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    fn process(
        &self,
        file: &FileDescriptor,
        output_path: PathBuf,
    ) -> Result<PathBuf, (FileStage, Error)> {
        let bytes = fs::read(&file.path).map_err(|e| (FileStage::Read, Error::Io(e)))?;
        let catalog = Catalog::from_bytes(&bytes).map_err(|e| (FileStage::Parse, e))?;
        tracing::debug!(file = %file.name, keys = catalog.len(), "parsed catalog");

        let content = self
            .format
            .transform(&catalog)
            .map_err(|e| (FileStage::Transform, e))?;

        // A JSON export extracted into the output directory is rewritten in place.
        let in_place = resolve(&file.path) == resolve(&output_path);

        fs::write(&output_path, content).map_err(|e| (FileStage::Write, Error::Io(e)))?;

        if in_place {
            tracing::debug!(file = %file.name, "source rewritten in place");
        } else {
            fs::remove_file(&file.path).map_err(|e| (FileStage::RemoveSource, Error::Io(e)))?;
        }

        Ok(output_path)
    }
}

/// Absolute form of a path whose file may not exist yet: the parent
/// directory is canonicalized and the file name appended.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(path) = fs::canonicalize(path) {
        return path;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(parent), Some(name)) => parent.join(name),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_source(dir: &Path, file_name: &str, content: &str) -> FileDescriptor {
        let path = dir.join(file_name);
        fs::write(&path, content).unwrap();
        let name = Path::new(file_name)
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        FileDescriptor::new(name, path)
    }

    #[test]
    fn test_output_path_strips_extension_and_directories() {
        let pipeline = Pipeline::new("out", OutputFormat::AndroidStrings);
        let plain = FileDescriptor::new("en", "export/en.json");
        let with_ext = FileDescriptor::new("de.json", "export/de.json");
        let namespaced = FileDescriptor::new("common/fr", "export/common/fr.json");

        assert_eq!(pipeline.output_path(&plain), Path::new("out/en.xml"));
        assert_eq!(pipeline.output_path(&with_ext), Path::new("out/de.xml"));
        assert_eq!(pipeline.output_path(&namespaced), Path::new("out/fr.xml"));
    }

    #[test]
    fn test_output_path_falls_back_to_source_name() {
        let pipeline = Pipeline::new("out", OutputFormat::Json);
        let unnamed = FileDescriptor::new("", "export/ko.json");
        assert_eq!(pipeline.output_path(&unnamed), Path::new("out/ko.json"));
    }

    #[test]
    fn test_run_writes_and_removes_source() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let file = write_source(src.path(), "en.json", r#"{"a": "hi", "b": null}"#);

        let pipeline = Pipeline::new(out.path(), OutputFormat::AndroidStrings);
        let report = pipeline.run(&[file.clone()]).unwrap();

        assert!(report.is_success());
        assert_eq!(report.written, vec![out.path().join("en.xml")]);
        assert!(!file.path.exists());
        let xml = fs::read_to_string(out.path().join("en.xml")).unwrap();
        assert!(xml.contains(r#"<string name="a">hi</string>"#));
    }

    #[test]
    fn test_run_isolates_failures() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let bad = write_source(src.path(), "broken.json", "{ not json");
        let good = write_source(src.path(), "en.json", r#"{"a": "hi"}"#);
        let missing = FileDescriptor::new("gone", src.path().join("gone.json"));

        let pipeline = Pipeline::new(out.path(), OutputFormat::Json);
        let report = pipeline
            .run(&[bad.clone(), good.clone(), missing])
            .unwrap();

        assert_eq!(report.written, vec![out.path().join("en.json")]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].name, "broken");
        assert_eq!(report.failures[0].stage, FileStage::Parse);
        assert_eq!(report.failures[1].name, "gone");
        assert_eq!(report.failures[1].stage, FileStage::Read);
        assert!(bad.path.exists());
        assert!(!good.path.exists());
        assert!(!out.path().join("broken.json").exists());
    }

    #[test]
    fn test_run_rejects_non_object_catalog() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let file = write_source(src.path(), "en.json", r#"["a"]"#);

        let report = Pipeline::new(out.path(), OutputFormat::Json)
            .run(&[file.clone()])
            .unwrap();

        assert!(report.written.is_empty());
        assert!(matches!(
            report.failures[0].error,
            Error::InvalidCatalog(_)
        ));
        assert!(file.path.exists());
    }

    #[test]
    fn test_run_reports_output_collision() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir(src.path().join("app")).unwrap();
        fs::create_dir(src.path().join("web")).unwrap();
        let first_path = src.path().join("app/en.json");
        let second_path = src.path().join("web/en.json");
        fs::write(&first_path, r#"{"a": "app"}"#).unwrap();
        fs::write(&second_path, r#"{"a": "web"}"#).unwrap();

        let files = vec![
            FileDescriptor::new("app/en", &first_path),
            FileDescriptor::new("web/en", &second_path),
        ];
        let report = Pipeline::new(out.path(), OutputFormat::AndroidStrings)
            .run(&files)
            .unwrap();

        assert_eq!(report.written, vec![out.path().join("en.xml")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage, FileStage::Collision);
        assert!(second_path.exists());
        let xml = fs::read_to_string(out.path().join("en.xml")).unwrap();
        assert!(xml.contains(">app<"));
    }

    #[test]
    fn test_output_over_pending_source_is_a_collision() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("common")).unwrap();
        let namespaced = dir.path().join("common/en.json");
        let top_level = dir.path().join("en.json");
        fs::write(&namespaced, r#"{"from": "common"}"#).unwrap();
        fs::write(&top_level, r#"{"from": "top"}"#).unwrap();

        let files = vec![
            FileDescriptor::new("common/en", &namespaced),
            FileDescriptor::new("en", &top_level),
        ];
        let report = Pipeline::new(dir.path(), OutputFormat::Json)
            .run(&files)
            .unwrap();

        assert_eq!(report.written, vec![dir.path().join("en.json")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "common/en");
        assert_eq!(report.failures[0].stage, FileStage::Collision);
        assert!(namespaced.exists());
        assert_eq!(
            fs::read_to_string(&top_level).unwrap(),
            "{\n  \"from\": \"top\"\n}\n"
        );
    }

    #[test]
    fn test_collision_leaves_later_source_unread() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let broken = write_source(src.path(), "en.json", "{ not json");
        fs::create_dir(src.path().join("web")).unwrap();
        let web = src.path().join("web/en.json");
        fs::write(&web, r#"{"a": "web"}"#).unwrap();

        let files = vec![broken.clone(), FileDescriptor::new("web/en", &web)];
        let report = Pipeline::new(out.path(), OutputFormat::Json)
            .run(&files)
            .unwrap();

        assert!(report.written.is_empty());
        assert_eq!(report.failures[0].stage, FileStage::Parse);
        assert_eq!(report.failures[1].stage, FileStage::Collision);
        assert!(web.exists());
        assert!(!out.path().join("en.json").exists());
    }

    #[test]
    fn test_json_in_place_keeps_output() {
        let dir = TempDir::new().unwrap();
        let file = write_source(dir.path(), "en.json", r#"{"a":null}"#);

        let report = Pipeline::new(dir.path(), OutputFormat::Json)
            .run(&[file.clone()])
            .unwrap();

        assert!(report.is_success());
        assert!(file.path.exists());
        assert_eq!(
            fs::read_to_string(&file.path).unwrap(),
            "{\n  \"a\": \"\"\n}\n"
        );
    }

    #[test]
    fn test_run_creates_output_dir() {
        let src = TempDir::new().unwrap();
        let out = src.path().join("nested/i18n");
        let file = write_source(src.path(), "en.json", r#"{"a": "b"}"#);

        let report = Pipeline::new(&out, OutputFormat::AndroidStrings)
            .run(&[file])
            .unwrap();

        assert_eq!(report.written, vec![out.join("en.xml")]);
    }

    #[test]
    fn test_failure_display() {
        let failure = FileFailure {
            name: "en".to_string(),
            stage: FileStage::Parse,
            error: Error::InvalidCatalog("expected a JSON object".to_string()),
        };
        assert_eq!(
            failure.to_string(),
            "en (parse failed): invalid catalog: expected a JSON object"
        );
    }
}
