use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const UNKNOWN_PRESS: &str = "Unknown Press";
pub const UNKNOWN_DATE: &str = "Unknown Date";
pub const NO_CONTENT_FOUND: &str = "No Content Found";
pub const FAILED_TO_LOAD: &str = "Failed to Load Article";

/// One collected article. Column order matches the dataset header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    pub content: String,
    #[serde(default)]
    pub press: String,
    #[serde(default)]
    pub date: String,
}

impl ArticleRecord {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        content: impl Into<String>,
        press: Option<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            content: content.into(),
            press: press.unwrap_or_else(|| UNKNOWN_PRESS.to_string()),
            date: date.unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        }
    }

    /// Fills blank press/date fields with their sentinels.
    pub fn with_defaults(mut self) -> Self {
        if self.press.trim().is_empty() {
            self.press = UNKNOWN_PRESS.to_string();
        }
        if self.date.trim().is_empty() {
            self.date = UNKNOWN_DATE.to_string();
        }
        self
    }
}

/// The three generated texts for one analyzer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub summary: String,
    pub keywords: String,
    pub insight: String,
}

impl InsightRecord {
    pub fn keyword_list(&self) -> Vec<&str> {
        self.keywords
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredInsight {
    pub id: i64,
    #[serde(flatten)]
    pub record: InsightRecord,
    pub created_at: DateTime<Utc>,
}

/// A dataset that has been written to object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedDataset {
    pub key: String,
    pub rows: usize,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStage {
    Started,
    Crawled,
    Staged,
    Dispatched,
    Notified,
}

impl RunStage {
    pub fn next(self) -> Option<RunStage> {
        match self {
            RunStage::Started => Some(RunStage::Crawled),
            RunStage::Crawled => Some(RunStage::Staged),
            RunStage::Staged => Some(RunStage::Dispatched),
            RunStage::Dispatched => Some(RunStage::Notified),
            RunStage::Notified => None,
        }
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStage::Started => "STARTED",
            RunStage::Crawled => "CRAWLED",
            RunStage::Staged => "STAGED",
            RunStage::Dispatched => "DISPATCHED",
            RunStage::Notified => "NOTIFIED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStatus {
    Success,
    Failure,
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStatus::Success => f.write_str("SUCCESS"),
            PipelineStatus::Failure => f.write_str("FAILURE"),
        }
    }
}

/// Ephemeral record of one collector run, used for the notification and the
/// response returned to the caller. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub stage: RunStage,
    pub status: PipelineStatus,
    pub s3_key: Option<String>,
    pub command_id: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl PipelineRun {
    pub fn start(now: DateTime<Utc>) -> Self {
        Self {
            stage: RunStage::Started,
            status: PipelineStatus::Success,
            s3_key: None,
            command_id: None,
            started_at: now,
        }
    }

    /// Moves exactly one step forward. Skipping or going back is an error.
    pub fn advance(&mut self, to: RunStage) -> Result<()> {
        if self.stage.next() != Some(to) {
            return Err(Error::StageTransition {
                from: self.stage.to_string(),
                to: to.to_string(),
            });
        }
        self.stage = to;
        Ok(())
    }

    pub fn mark_crawled(&mut self) -> Result<()> {
        self.advance(RunStage::Crawled)
    }

    pub fn mark_staged(&mut self, key: impl Into<String>) -> Result<()> {
        self.advance(RunStage::Staged)?;
        self.s3_key = Some(key.into());
        Ok(())
    }

    pub fn mark_dispatched(&mut self, command_id: impl Into<String>) -> Result<()> {
        self.advance(RunStage::Dispatched)?;
        self.command_id = Some(command_id.into());
        Ok(())
    }

    pub fn mark_notified(&mut self) -> Result<()> {
        self.advance(RunStage::Notified)
    }

    pub fn fail(&mut self) {
        self.status = PipelineStatus::Failure;
    }

    pub fn response(&self) -> PipelineResponse {
        let (status_code, message) = match self.status {
            PipelineStatus::Success => (200, "success"),
            PipelineStatus::Failure => (500, "failure"),
        };
        PipelineResponse {
            status_code,
            body: RunSummary {
                message: message.to_string(),
                status: self.status,
                s3_key: self.s3_key.clone().unwrap_or_default(),
                command_id: self.command_id.clone().unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub message: String,
    pub status: PipelineStatus,
    pub s3_key: String,
    pub command_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: RunSummary,
}
