//! Contact form recorder
//!
//! Submissions are appended to a CSV file instead of being mailed.

use crate::error::AppError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Payload posted by the contact form
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

/// One row of the submissions file
#[derive(Debug, Serialize)]
struct SubmissionRow<'a> {
    timestamp: String,
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// Appends submissions to a CSV file, writing the header only once
#[derive(Debug)]
pub struct ContactRecorder {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ContactRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one submission stamped with the current local time
    pub fn record(&self, form: &ContactForm) -> Result<(), AppError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.record_at(form, timestamp)
    }

    fn record_at(&self, form: &ContactForm, timestamp: String) -> Result<(), AppError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| AppError::ContactSave("recorder lock poisoned".to_string()))?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| AppError::ContactSave(e.to_string()))?;
                tracing::info!("Created directory: {}", dir.display());
            }
        }

        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::ContactSave(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        writer
            .serialize(SubmissionRow {
                timestamp,
                name: &form.name,
                email: &form.email,
                subject: &form.subject,
                message: &form.body,
            })
            .map_err(|e| AppError::ContactSave(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| AppError::ContactSave(e.to_string()))?;

        tracing::info!("Contact form data appended to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, body: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            subject: "Hello".to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_first_submission_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ContactRecorder::new(dir.path().join("contact_submissions.csv"));

        recorder
            .record_at(&form("Ada", "Nice site"), "2026-01-02 03:04:05".to_string())
            .unwrap();

        let contents = std::fs::read_to_string(recorder.path()).unwrap();
        assert_eq!(
            contents,
            "timestamp,name,email,subject,message\n\
             2026-01-02 03:04:05,Ada,ada@example.com,Hello,Nice site\n"
        );
    }

    #[test]
    fn test_later_submissions_append_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ContactRecorder::new(dir.path().join("contact_submissions.csv"));

        recorder.record(&form("Ada", "first")).unwrap();
        recorder.record(&form("Grace", "second")).unwrap();

        let contents = std::fs::read_to_string(recorder.path()).unwrap();
        assert_eq!(contents.matches("timestamp,name").count(), 1);
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.lines().nth(2).unwrap().ends_with("Grace,grace@example.com,Hello,second"));
    }

    #[test]
    fn test_fields_with_commas_and_newlines_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ContactRecorder::new(dir.path().join("out.csv"));

        recorder
            .record(&form("Ada", "line one,\nline \"two\""))
            .unwrap();

        let mut reader = csv::Reader::from_path(recorder.path()).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][4], "line one,\nline \"two\"");
    }

    #[test]
    fn test_missing_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/contact_submissions.csv");
        let recorder = ContactRecorder::new(&path);

        recorder.record(&form("Ada", "hi")).unwrap();

        assert!(path.is_file());
    }
}
