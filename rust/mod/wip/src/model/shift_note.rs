use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shift::Shift;

fn default_author() -> String {
    "Anonymous".to_string()
}

/// A handoff note left by one shift for the next.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftNote {
    #[serde(default)]
    pub id: String,

    pub notes: String,

    pub shift: Shift,

    #[serde(default = "default_author")]
    pub author: String,

    /// Local calendar day the note belongs to.
    pub date: NaiveDate,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl ShiftNote {
    pub fn new(notes: String, shift: Shift, author: Option<String>, date: NaiveDate) -> Self {
        let author = author
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(default_author);
        Self {
            id: String::new(),
            notes,
            shift,
            author,
            date,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// A shift note moved out of the live board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedShiftNote {
    #[serde(default)]
    pub id: String,

    /// Id the note had while it was live.
    #[serde(default)]
    pub source_id: String,

    pub notes: String,

    pub shift: Shift,

    #[serde(default = "default_author")]
    pub author: String,

    pub date: NaiveDate,

    /// Local day the archive pass ran.
    pub archive_date: NaiveDate,

    /// Creation time of the live note.
    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub archived_at: String,
}

impl ArchivedShiftNote {
    pub fn from_note(note: ShiftNote, archive_date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            source_id: note.id,
            notes: note.notes,
            shift: note.shift,
            author: note.author,
            date: note.date,
            archive_date,
            created_at: note.created_at,
            archived_at: String::new(),
        }
    }
}
