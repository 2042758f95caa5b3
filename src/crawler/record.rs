use serde::{Deserialize, Serialize};

use crate::error::{FailureKind, ScrapeError};

/// Sentinel for a field the pipeline could not determine
pub const NULL_VALUE: &str = "NULL";

/// Timestamp layout of `ScrapeResult::timestamp`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fixed seven-field job posting record.
///
/// Every field holds extracted text or `"NULL"`, never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_title: String,
    pub job_description: String,
    pub job_location: String,
    pub job_salary: String,
    pub job_id: String,
    pub basic_qualifications: String,
    pub preferred_qualifications: String,
}

/// Field names in wire order
pub const JOB_FIELDS: [&str; 7] = [
    "job_title",
    "job_description",
    "job_location",
    "job_salary",
    "job_id",
    "basic_qualifications",
    "preferred_qualifications",
];

/// Fields the model returned; `None` where it left a key out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesizedFields {
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub job_location: Option<String>,
    pub job_salary: Option<String>,
    pub job_id: Option<String>,
    pub basic_qualifications: Option<String>,
    pub preferred_qualifications: Option<String>,
}

impl Default for JobRecord {
    fn default() -> Self {
        Self::unknown()
    }
}

impl JobRecord {
    /// Record with every field set to `"NULL"`
    pub fn unknown() -> Self {
        Self {
            job_title: NULL_VALUE.to_string(),
            job_description: NULL_VALUE.to_string(),
            job_location: NULL_VALUE.to_string(),
            job_salary: NULL_VALUE.to_string(),
            job_id: NULL_VALUE.to_string(),
            basic_qualifications: NULL_VALUE.to_string(),
            preferred_qualifications: NULL_VALUE.to_string(),
        }
    }

    /// `(name, value)` pairs in wire order
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("job_title", self.job_title.as_str()),
            ("job_description", self.job_description.as_str()),
            ("job_location", self.job_location.as_str()),
            ("job_salary", self.job_salary.as_str()),
            ("job_id", self.job_id.as_str()),
            ("basic_qualifications", self.basic_qualifications.as_str()),
            ("preferred_qualifications", self.preferred_qualifications.as_str()),
        ]
    }

    /// Overlay model output: a field is replaced only when the model gave a determined value
    pub fn merge(mut self, synthesized: &SynthesizedFields) -> Self {
        overlay(&mut self.job_title, &synthesized.job_title);
        overlay(&mut self.job_description, &synthesized.job_description);
        overlay(&mut self.job_location, &synthesized.job_location);
        overlay(&mut self.job_salary, &synthesized.job_salary);
        overlay(&mut self.job_id, &synthesized.job_id);
        overlay(&mut self.basic_qualifications, &synthesized.basic_qualifications);
        overlay(&mut self.preferred_qualifications, &synthesized.preferred_qualifications);
        self
    }
}

fn overlay(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        if is_determined(value) {
            *target = value.clone();
        }
    }
}

/// Whether `value` is real text rather than the sentinel or blank
pub fn is_determined(value: &str) -> bool {
    !value.trim().is_empty() && value != NULL_VALUE
}

/// Map possibly-empty text to the sentinel
pub fn or_null(value: impl Into<String>) -> String {
    let value = value.into();
    if value.trim().is_empty() {
        NULL_VALUE.to_string()
    } else {
        value
    }
}

/// One URL's pipeline output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub url: String,

    /// Capture time, `YYYY-MM-DD HH:MM:SS` local time
    pub timestamp: String,

    #[serde(flatten)]
    pub record: JobRecord,

    /// Diagnostic, present only when a stage degraded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip)]
    pub failure: Option<FailureKind>,
}

impl ScrapeResult {
    pub fn new(url: &str, record: JobRecord, error: Option<ScrapeError>) -> Self {
        Self {
            url: url.to_string(),
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            record,
            failure: error.as_ref().map(ScrapeError::kind),
            error: error.map(|e| e.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
