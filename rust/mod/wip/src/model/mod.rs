mod history;
mod order;
mod shift_note;

pub use history::{ActionType, EntityType, HistoryEntry};
pub use order::{ArchivedOrder, Order, OrderFields};
pub use shift_note::{ArchivedShiftNote, ShiftNote};
