//! Derived status of a required client document.
//!
//! A document's status is never stored. It is recomputed on every read from
//! the deadline and whether a file has been attached.

use serde::{Deserialize, Serialize};

use crate::lookups::{define_lookup_enum, Lookup};
use crate::types::Date;

define_lookup_enum! {
    /// Document status as shown on the dashboard.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    DocumentStatus("document_status") {
        Overdue = 1 => ("overdue", "Overdue"),
        Upload = 2 => ("upload", "Uploaded"),
        Pending = 3 => ("pending", "Pending"),
    }
}

impl DocumentStatus {
    /// Parse the lowercase wire form (`"overdue"`, `"upload"`, `"pending"`).
    pub fn parse(value: &str) -> Option<Self> {
        Self::from_key(value)
    }
}

/// Derive a document's status relative to `today`.
///
/// A past deadline is overdue regardless of the file. A deadline of today
/// with a file attached reads as uploaded. Everything else is pending.
pub fn determine_status(deadline: Date, has_file: bool, today: Date) -> DocumentStatus {
    if deadline < today {
        DocumentStatus::Overdue
    } else if deadline == today && has_file {
        DocumentStatus::Upload
    } else {
        DocumentStatus::Pending
    }
}
