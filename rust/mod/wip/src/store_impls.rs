//! KvStore implementations for WIP models.

use wip_core::{new_id, now_rfc3339};
use wip_store::KvStore;

use crate::model::*;

macro_rules! impl_kv_timestamped {
    ($ty:ident, $resource:expr, $prefix:expr) => {
        impl KvStore for $ty {
            const RESOURCE: &'static str = $resource;
            fn kv_prefix() -> &'static str { $prefix }
            fn key_value(&self) -> String { self.id.clone() }
            fn before_create(&mut self) {
                if self.id.is_empty() {
                    self.id = new_id();
                }
                let now = now_rfc3339();
                if self.created_at.is_empty() { self.created_at = now.clone(); }
                self.updated_at = now;
            }
            fn before_update(&mut self) {
                self.updated_at = now_rfc3339();
            }
        }
    };
}

impl_kv_timestamped!(Order, "order", "wip:order:");
impl_kv_timestamped!(ArchivedOrder, "archived order", "wip:archived_order:");
impl_kv_timestamped!(ShiftNote, "shift note", "wip:shift_note:");

// Archived notes keep the live note's createdAt and stamp archivedAt instead.
impl KvStore for ArchivedShiftNote {
    const RESOURCE: &'static str = "archived shift note";
    fn kv_prefix() -> &'static str { "wip:archived_shift_note:" }
    fn key_value(&self) -> String { self.id.clone() }
    fn before_create(&mut self) {
        if self.id.is_empty() {
            self.id = new_id();
        }
        let now = now_rfc3339();
        if self.created_at.is_empty() { self.created_at = now.clone(); }
        if self.archived_at.is_empty() { self.archived_at = now; }
    }
}

// History is append-only: no update hook.
impl KvStore for HistoryEntry {
    const RESOURCE: &'static str = "history entry";
    fn kv_prefix() -> &'static str { "wip:history:" }
    fn key_value(&self) -> String { self.id.clone() }
    fn before_create(&mut self) {
        if self.id.is_empty() {
            self.id = new_id();
        }
        if self.timestamp.is_empty() {
            self.timestamp = now_rfc3339();
        }
    }
}
