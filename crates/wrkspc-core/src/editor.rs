//! Editor file references pushed by the host.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::brand::{ByteOffset, FilePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub offset: ByteOffset,
    pub line: u32,
    pub character: u32,
}

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: ByteOffset,
    pub end: ByteOffset,
}

impl Span {
    #[must_use]
    pub fn contains(self, offset: ByteOffset) -> bool {
        self.start <= offset && offset < self.end
    }

    #[must_use]
    pub fn len(self) -> u32 {
        self.end.get().saturating_sub(self.start.get())
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorFile {
    pub path: FilePath,
    pub is_dirty: bool,
    pub language_id: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Span>,
}

impl EditorFile {
    /// Whether the cursor sits inside `span`.
    #[must_use]
    pub fn cursor_within(&self, span: Span) -> bool {
        self.cursor.is_some_and(|cursor| span.contains(cursor.offset))
    }
}
