//! Dataset metadata as reported by the host-side loader.
//!
//! Parsing and hashing happen elsewhere; these records are stored and
//! forwarded as-is.

use serde::{Deserialize, Serialize};

use crate::brand::{Base64Content, ColumnIndex, ContentHash, DatasetId, FilePath, RowIndex};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMeta {
    pub id: DatasetId,
    pub path: FilePath,
    pub hash: ContentHash,
    /// Size in bytes.
    pub size: u64,
    pub rows: u64,
    pub header: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CsvSettings>,
}

impl DatasetMeta {
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<ColumnIndex> {
        self.header
            .iter()
            .position(|column| column == name)
            .and_then(|index| u32::try_from(index).ok())
            .map(ColumnIndex::new)
    }

    /// Index of data row `row`, or `None` past the last row.
    #[must_use]
    pub fn row_index(&self, row: u64) -> Option<RowIndex> {
        if row >= self.rows {
            return None;
        }
        u32::try_from(row).ok().map(RowIndex::new)
    }

    #[must_use]
    pub fn last_row(&self) -> Option<RowIndex> {
        self.rows.checked_sub(1).and_then(|row| self.row_index(row))
    }
}

/// One entry of the dataset slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetEntry {
    pub meta: DatasetMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Base64Content>,
}

impl DatasetEntry {
    #[must_use]
    pub fn new(meta: DatasetMeta) -> Self {
        Self {
            meta,
            content: None,
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: Base64Content) -> Self {
        self.content = Some(content);
        self
    }
}
