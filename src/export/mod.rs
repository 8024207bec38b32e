pub mod helpers;
pub mod html;
pub mod markdown;
pub mod report;

pub use helpers::ExportOptions;

use crate::recorder::storage::steps_to_json;
use crate::recorder::types::Step;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
    Document,
    Report,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
    #[error("{0}")]
    Write(String),
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "doc" | "document" => Ok(Self::Document),
            "report" | "pdf" => Ok(Self::Report),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Markdown => "workmap-workflow.md",
            Self::Json => "workmap-workflow.json",
            Self::Document => "workmap-workflow.doc",
            Self::Report => "workmap-workflow.html",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown;charset=utf-8",
            Self::Json => "application/json;charset=utf-8",
            Self::Document => "application/msword",
            Self::Report => "text/html;charset=utf-8",
        }
    }

    /// Render `steps` in this format. Never fails.
    pub fn render(&self, steps: &[Step], options: &ExportOptions) -> String {
        match self {
            Self::Markdown => markdown::generate(steps, options),
            Self::Json => steps_to_json(steps),
            Self::Document => html::generate(steps, options),
            Self::Report => report::generate(steps, options),
        }
    }
}

/// Turn an IO error into a user-friendly message.
fn friendly_write_error(e: &std::io::Error, path: &Path) -> String {
    let path = path.display();
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => {
            format!("Cannot save to \"{path}\": permission denied. Is the file open in another app or the folder read-only?")
        }
        std::io::ErrorKind::NotFound => {
            format!("The folder for \"{path}\" does not exist.")
        }
        _ => format!("Could not save file: {e}"),
    }
}

/// Render and write to `output_path`.
pub fn write(
    steps: &[Step],
    format: ExportFormat,
    options: &ExportOptions,
    output_path: &Path,
) -> Result<(), ExportError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            return Err(ExportError::Write(format!(
                "The folder \"{}\" does not exist.",
                parent.display()
            )));
        }
    }

    let content = format.render(steps, options);
    std::fs::write(output_path, content)
        .map_err(|e| ExportError::Write(friendly_write_error(&e, output_path)))?;
    tracing::info!(?format, path = %output_path.display(), steps = steps.len(), "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_str_valid() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("doc".parse::<ExportFormat>().unwrap(), ExportFormat::Document);
        assert_eq!("report".parse::<ExportFormat>().unwrap(), ExportFormat::Report);
    }

    #[test]
    fn format_from_str_invalid() {
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn file_names_match_format() {
        assert!(ExportFormat::Markdown.file_name().ends_with(".md"));
        assert!(ExportFormat::Json.file_name().ends_with(".json"));
        assert_eq!(ExportFormat::Document.mime(), "application/msword");
    }

    #[test]
    fn write_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(ExportFormat::Markdown.file_name());
        write(&[Step::sample()], ExportFormat::Markdown, &ExportOptions::now(), &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# WorkMap Workflow Recording"));
    }

    #[test]
    fn write_into_missing_folder_fails() {
        let result = write(
            &[],
            ExportFormat::Json,
            &ExportOptions::now(),
            Path::new("/nonexistent/dir/steps.json"),
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("does not exist"));
    }
}
