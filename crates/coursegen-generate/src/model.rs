use std::collections::BTreeMap;
use std::path::PathBuf;

use coursegen_core::{DatasetAudit, LecturerId, REPORT_VERSION};
use serde::{Deserialize, Serialize};

use crate::assignment::BackfillOutcome;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where run artifacts are written.
    pub out_dir: PathBuf,
    /// Fail the run when a course ends below the enrollment floor.
    pub strict: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            strict: false,
        }
    }
}

/// Summary of an emitted table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_requested: Option<u64>,
    pub rows_generated: u64,
    pub file: String,
    pub bytes: u64,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<u32>,
}

impl GenerationIssue {
    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.to_string(),
            message: message.into(),
            table: None,
            entity_id: None,
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            level: "error".to_string(),
            ..Self::warning(code, message)
        }
    }

    pub fn on(mut self, table: &str, entity_id: u32) -> Self {
        self.table = Some(table.to_string());
        self.entity_id = Some(entity_id);
        self
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub report_version: String,
    pub run_id: String,
    pub seed: u64,
    pub tables: Vec<TableReport>,
    pub synthesized_lecturers: Vec<LecturerId>,
    pub backfills: Vec<BackfillOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit: Option<DatasetAudit>,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            report_version: REPORT_VERSION.to_string(),
            run_id,
            seed,
            tables: Vec::new(),
            synthesized_lecturers: Vec::new(),
            backfills: Vec::new(),
            audit: None,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }

    pub fn record_table(&mut self, table: TableReport) {
        self.bytes_written += table.bytes;
        self.tables.push(table);
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|table| table.table == name)
    }
}
