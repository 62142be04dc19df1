use serde::{Deserialize, Serialize};

/// Non-empty raw cell values read from the selected column, in source row
/// order. Values keep their original text; trimming and lower-casing happen
/// during the transform stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnValues {
    pub column: String,
    pub values: Vec<String>,
}

/// Outcome of one de-duplication pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupReport {
    /// Unique normalized addresses, grouped by domain and then sorted by the
    /// full address within each domain.
    pub unique_emails: Vec<String>,
    /// Timestamped header line followed by one line per discarded duplicate.
    pub log_entries: Vec<String>,
    pub unique_count: usize,
    pub duplicate_count: usize,
}

impl DedupReport {
    /// The comma-joined list, ready to hand out as a `.txt` download.
    pub fn email_list(&self) -> String {
        self.unique_emails.join(", ")
    }

    /// The duplicate log, one entry per line.
    pub fn log_text(&self) -> String {
        self.log_entries.join("\n")
    }
}
