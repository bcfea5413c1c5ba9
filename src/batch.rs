//! Folder conversion.
//!
//! Every report file found directly inside the input folder becomes one
//! `.xlsx` file in the output folder, named after the report
//! (`audcad-144-sma.htm` becomes `audcad-144-sma.xlsx`). Documents are
//! independent: a document that fails is counted and logged, and the batch
//! carries on with the next one.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::common::{Error, Result, decode_document};
use crate::config::ConvertOptions;
use crate::report::{ExtractWarning, extract_records, write_report};

/// Result of converting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Records extracted (and written, if `written`).
    pub records: usize,
    pub skipped_rows: usize,
    /// Whether a spreadsheet was written. Documents without records
    /// produce no file.
    pub written: bool,
    pub warnings: Vec<ExtractWarning>,
}

/// A document whose conversion failed.
#[derive(Debug)]
pub struct DocumentFailure {
    pub input: PathBuf,
    pub error: Error,
}

/// Totals for a folder conversion.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Report files found in the input folder
    pub discovered: usize,
    /// Spreadsheets written
    pub written: usize,
    /// Documents without result rows
    pub skipped: usize,
    /// Documents that failed with an error
    pub failed: usize,
    /// Records written across all spreadsheets
    pub total_records: usize,
    /// Per-document outcomes, in processing order
    pub documents: Vec<DocumentOutcome>,
    pub failures: Vec<DocumentFailure>,
}

impl BatchSummary {
    fn record(&mut self, input: PathBuf, result: Result<DocumentOutcome>) {
        match result {
            Ok(outcome) => {
                if outcome.written {
                    self.written += 1;
                    self.total_records += outcome.records;
                } else {
                    self.skipped += 1;
                }
                self.documents.push(outcome);
            },
            Err(error) => {
                self.failed += 1;
                self.failures.push(DocumentFailure { input, error });
            },
        }
    }

    /// Whether every discovered document was converted or skipped cleanly.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Convert one report file into the spreadsheet at `output`.
///
/// A document without result rows writes nothing and reports
/// `written: false`. Read and write errors are returned.
pub fn convert_document(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<DocumentOutcome> {
    let name = document_name(input);
    let bytes = fs::read(input)?;
    let html = decode_document(&bytes);

    let extraction = extract_records(&name, &html, options);
    let mut outcome = DocumentOutcome {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        records: extraction.records.len(),
        skipped_rows: extraction.skipped_rows,
        written: false,
        warnings: extraction.warnings,
    };

    if extraction.records.is_empty() {
        tracing::info!(document = %name, "Skipped, no data.");
        return Ok(outcome);
    }

    write_report(&extraction.records, output, options)?;
    outcome.written = true;

    tracing::info!(
        document = %name,
        output = %output.display(),
        records = outcome.records,
        "Spreadsheet written."
    );

    Ok(outcome)
}

/// Convert every report file in `input_dir` into `output_dir`.
///
/// The output folder is created (with parents) when there is at least one
/// report to convert. A missing input folder is the only error; failures of
/// single documents are collected in the summary.
pub fn convert_folder(
    input_dir: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<BatchSummary> {
    if !input_dir.is_dir() {
        return Err(Error::InputDirMissing(input_dir.to_path_buf()));
    }

    let inputs = discover_reports(input_dir, &options.extensions)?;
    let mut summary = BatchSummary {
        discovered: inputs.len(),
        ..Default::default()
    };

    if inputs.is_empty() {
        tracing::info!(input = %input_dir.display(), "No report files found.");
        return Ok(summary);
    }

    tracing::info!(
        count = inputs.len(),
        input = %input_dir.display(),
        "Found report files."
    );
    fs::create_dir_all(output_dir)?;

    let jobs = plan_outputs(inputs, output_dir);
    let convert = |(input, output): &(PathBuf, PathBuf)| {
        let result = convert_document(input, output, options);
        if let Err(ref e) = result {
            tracing::error!(document = %input.display(), error = %e, "Conversion failed.");
        }
        (input.clone(), result)
    };

    let results: Vec<(PathBuf, Result<DocumentOutcome>)> = if options.parallel {
        jobs.par_iter().map(convert).collect()
    } else {
        jobs.iter().map(convert).collect()
    };

    for (input, result) in results {
        summary.record(input, result);
    }

    tracing::info!(
        written = summary.written,
        skipped = summary.skipped,
        failed = summary.failed,
        records = summary.total_records,
        "Batch finished."
    );

    Ok(summary)
}

/// Report files directly inside `dir`, sorted by path.
///
/// Extensions compare case-insensitively against `extensions` (no dot).
pub fn discover_reports(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if matches {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// `<stem>.xlsx` inside `output_dir`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "report".into());
    let mut name = stem;
    name.push(".xlsx");
    output_dir.join(name)
}

/// Pair every input with its output path.
///
/// When two inputs share a stem (`a.htm` and `a.html`), the later one keeps
/// its full file name (`a.html.xlsx`) so no output is written twice.
fn plan_outputs(inputs: Vec<PathBuf>, output_dir: &Path) -> Vec<(PathBuf, PathBuf)> {
    let mut taken = HashSet::new();
    inputs
        .into_iter()
        .map(|input| {
            let mut output = output_path(&input, output_dir);
            if !taken.insert(output.clone()) {
                let mut name = input.file_name().unwrap_or_default().to_os_string();
                name.push(".xlsx");
                output = output_dir.join(name);
                tracing::warn!(
                    document = %input.display(),
                    output = %output.display(),
                    "Output name already used by another report."
                );
                taken.insert(output.clone());
            }
            (input, output)
        })
        .collect()
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_REPORT: &str = "<table></table><table><tr><td>Pass</td></tr></table>";

    #[test]
    fn test_output_path_replaces_extension() {
        let out = output_path(Path::new("in/audcad-144-sma.htm"), Path::new("out"));
        assert_eq!(out, Path::new("out/audcad-144-sma.xlsx"));
    }

    #[test]
    fn test_plan_outputs_avoids_collisions() {
        let plan = plan_outputs(
            vec![PathBuf::from("in/a.htm"), PathBuf::from("in/a.html")],
            Path::new("out"),
        );
        assert_eq!(plan[0].1, Path::new("out/a.xlsx"));
        assert_eq!(plan[1].1, Path::new("out/a.html.xlsx"));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.htm", "a.HTML", "c.txt", "d.htm.bak"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.htm")).unwrap();

        let found = discover_reports(dir.path(), &ConvertOptions::default().extensions).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.HTML", "b.htm"]);
    }

    #[test]
    fn test_missing_input_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = convert_folder(&missing, dir.path(), &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InputDirMissing(p) if p == missing));
    }

    #[test]
    fn test_document_without_rows_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.htm");
        let output = dir.path().join("empty.xlsx");
        fs::write(&input, EMPTY_REPORT).unwrap();

        let outcome = convert_document(&input, &output, &ConvertOptions::default()).unwrap();
        assert!(!outcome.written);
        assert_eq!(outcome.records, 0);
        assert_eq!(outcome.warnings, vec![ExtractWarning::NoValidRows]);
        assert!(!output.exists());
    }

    #[test]
    fn test_unreadable_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_document(
            &dir.path().join("missing.htm"),
            &dir.path().join("missing.xlsx"),
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_empty_folder_creates_no_output() {
        let input = tempfile::tempdir().unwrap();
        let output = input.path().join("out");
        let summary = convert_folder(input.path(), &output, &ConvertOptions::default()).unwrap();
        assert_eq!(summary.discovered, 0);
        assert!(summary.is_success());
        assert!(!output.exists());
    }
}
