use crate::domain::model::Submission;
use crate::domain::ports::ActivityLog;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const LOG_TIMESTAMP_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";

/// Plain-text append-only logs: one for deliveries, one for dispatch failures.
#[derive(Debug, Clone)]
pub struct FileActivityLog {
    activity_path: PathBuf,
    error_path: PathBuf,
}

impl FileActivityLog {
    pub fn new(activity_path: impl Into<PathBuf>, error_path: impl Into<PathBuf>) -> Self {
        Self {
            activity_path: activity_path.into(),
            error_path: error_path.into(),
        }
    }

    async fn append(path: &Path, line: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

pub fn delivery_line(submission: &Submission) -> String {
    format!(
        "{} - Message from: {} ({})\n",
        submission.received_at.format(LOG_TIMESTAMP_FORMAT),
        submission.name,
        submission.email
    )
}

pub fn failure_line(mailbox: &str, at: DateTime<Local>) -> String {
    format!(
        "{} Contact form error: Failed to send email to {}\n",
        at.format(LOG_TIMESTAMP_FORMAT),
        mailbox
    )
}

#[async_trait]
impl ActivityLog for FileActivityLog {
    async fn record_delivery(&self, submission: &Submission) -> Result<()> {
        Self::append(&self.activity_path, &delivery_line(submission)).await
    }

    async fn record_failure(&self, mailbox: &str, at: DateTime<Local>) -> Result<()> {
        Self::append(&self.error_path, &failure_line(mailbox, at)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn submission() -> Submission {
        Submission {
            name: "Ivan Petrov".to_string(),
            email: "ivan@example.com".to_string(),
            phone: None,
            message: "Hello, I need a website quote.".to_string(),
            received_at: Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            source_address: "127.0.0.1".to_string(),
        }
    }

    #[test]
    fn test_delivery_line_format() {
        assert_eq!(
            delivery_line(&submission()),
            "[2025-01-02 03:04:05] - Message from: Ivan Petrov (ivan@example.com)\n"
        );
    }

    #[tokio::test]
    async fn test_appends_without_truncating() {
        let dir = TempDir::new().unwrap();
        let log = FileActivityLog::new(
            dir.path().join("logs/contact_log.txt"),
            dir.path().join("logs/contact_error.log"),
        );

        log.record_delivery(&submission()).await.unwrap();
        log.record_delivery(&submission()).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("logs/contact_log.txt")).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!dir.path().join("logs/contact_error.log").exists());
    }

    #[tokio::test]
    async fn test_failures_go_to_error_log() {
        let dir = TempDir::new().unwrap();
        let log = FileActivityLog::new(dir.path().join("ok.txt"), dir.path().join("err.log"));
        let at = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

        log.record_failure("office@example.com", at).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("err.log")).unwrap();
        assert_eq!(
            content,
            "[2025-01-02 03:04:05] Contact form error: Failed to send email to office@example.com\n"
        );
        assert!(!dir.path().join("ok.txt").exists());
    }
}
