use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use wip_core::ServiceError;

use crate::bucket::{classify_day, newest_date_first, Grouped, NoteDay};
use crate::model::*;
use crate::shift::Shift;
use super::{require, WipService};

/// Fields a shift-note edit may change.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    pub notes: Option<String>,
    pub shift: Option<Shift>,
    pub author: Option<String>,
}

/// Result of an end-of-day archive pass.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteArchiveOutcome {
    pub archived: usize,
    pub message: String,
}

fn note_label(notes: &str) -> String {
    const MAX: usize = 50;
    let line = notes.lines().next().unwrap_or_default().trim();
    match line.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

fn oldest_created_first(a: &ShiftNote, b: &ShiftNote) -> std::cmp::Ordering {
    a.created_at.cmp(&b.created_at)
}

impl WipService {
    // ── Live notes ──

    fn notes_on(&self, wanted: NoteDay) -> Result<Vec<ShiftNote>, ServiceError> {
        let today = self.today();
        let mut notes: Vec<ShiftNote> = self
            .notes
            .list()?
            .into_iter()
            .filter(|n| classify_day(today, n.date) == wanted)
            .collect();
        notes.sort_by(oldest_created_first);
        Ok(notes)
    }

    pub fn notes_today(&self) -> Result<Vec<ShiftNote>, ServiceError> {
        self.notes_on(NoteDay::Today)
    }

    pub fn notes_yesterday(&self) -> Result<Vec<ShiftNote>, ServiceError> {
        self.notes_on(NoteDay::Yesterday)
    }

    pub fn create_note(
        &self,
        notes: String,
        shift: Shift,
        author: Option<String>,
        actor: &str,
    ) -> Result<ShiftNote, ServiceError> {
        require("notes", &notes)?;
        let author = author.or_else(|| Some(actor.to_string()));
        let note = self
            .notes
            .save_new(ShiftNote::new(notes, shift, author, self.today()))?;

        self.audit(HistoryEntry::new(
            ActionType::Create,
            EntityType::ShiftNote,
            &note.id,
            note_label(&note.notes),
            actor,
            serde_json::json!({ "shift": note.shift, "date": note.date }),
        ));
        Ok(note)
    }

    pub fn update_note(
        &self,
        id: &str,
        update: NoteUpdate,
        actor: &str,
    ) -> Result<ShiftNote, ServiceError> {
        let mut note = self.notes.get_or_err(id)?;
        let mut changes = serde_json::Map::new();

        if let Some(notes) = update.notes {
            require("notes", &notes)?;
            changes.insert("notes".into(), notes.clone().into());
            note.notes = notes;
        }
        if let Some(shift) = update.shift {
            changes.insert("shift".into(), shift.as_str().into());
            note.shift = shift;
        }
        if let Some(author) = update.author {
            let author = author.trim();
            note.author = if author.is_empty() { "Anonymous".into() } else { author.into() };
            changes.insert("author".into(), note.author.clone().into());
        }

        let saved = self.notes.save(note)?;
        self.audit(HistoryEntry::new(
            ActionType::Update,
            EntityType::ShiftNote,
            id,
            note_label(&saved.notes),
            actor,
            serde_json::Value::Object(changes),
        ));
        Ok(saved)
    }

    pub fn delete_note(&self, id: &str, actor: &str) -> Result<ShiftNote, ServiceError> {
        let note = self.notes.delete(id)?;
        self.audit(HistoryEntry::new(
            ActionType::Delete,
            EntityType::ShiftNote,
            id,
            note_label(&note.notes),
            actor,
            serde_json::Value::Null,
        ));
        Ok(note)
    }

    // ── End-of-day archive ──

    /// Move notes dated before yesterday into the archive.
    ///
    /// Does nothing before the policy's archive hour. Today's and yesterday's
    /// notes always stay on the board.
    pub fn archive_notes(&self, actor: &str) -> Result<NoteArchiveOutcome, ServiceError> {
        let now = self.now();
        let policy = self.policy();
        if !policy.is_open(&now) {
            return Ok(NoteArchiveOutcome {
                archived: 0,
                message: format!("Archiving only occurs after {}:00", policy.archive_hour),
            });
        }

        let today = now.date_naive();
        let stale: Vec<ShiftNote> = self
            .notes
            .list()?
            .into_iter()
            .filter(|n| policy.is_archivable(today, n.date))
            .collect();
        if stale.is_empty() {
            return Ok(NoteArchiveOutcome {
                archived: 0,
                message: "No notes to archive".into(),
            });
        }

        let ids: Vec<String> = stale.iter().map(|n| n.id.clone()).collect();
        let copies = stale
            .into_iter()
            .map(|n| ArchivedShiftNote::from_note(n, today))
            .collect();
        let archived = self
            .archived_notes
            .save_new_batch_moving::<ShiftNote>(copies, &ids)?;
        info!(count = archived.len(), cutoff = %policy.cutoff(today), "archived shift notes");

        for note in &archived {
            self.audit(HistoryEntry::new(
                ActionType::Archive,
                EntityType::ShiftNote,
                &note.source_id,
                note_label(&note.notes),
                actor,
                serde_json::json!({ "archiveDate": today }),
            ));
        }

        Ok(NoteArchiveOutcome {
            archived: archived.len(),
            message: "Notes archived successfully".into(),
        })
    }

    /// Archived notes keyed by the day they were written, newest day first.
    pub fn archived_notes_by_date(&self) -> Result<Grouped<ArchivedShiftNote>, ServiceError> {
        let archived = self.archived_notes.list()?;
        Ok(Grouped::partition(archived, |n| n.date.to_string())
            .sort_keys_by(newest_date_first)
            .sort_items_by(|a, b| a.created_at.cmp(&b.created_at)))
    }

    pub fn archived_notes_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ArchivedShiftNote>, ServiceError> {
        let mut notes: Vec<ArchivedShiftNote> = self
            .archived_notes
            .list()?
            .into_iter()
            .filter(|n| n.date == date)
            .collect();
        notes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(notes)
    }
}
