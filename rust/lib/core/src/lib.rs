pub mod clock;
pub mod config;
pub mod error;
pub mod module;
pub mod types;

pub use clock::{Clock, FixedClock, LocalClock, OffsetClock};
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use module::Module;
pub use types::{ListParams, ListResult, merge_patch, new_id, now_rfc3339, paginate, stamp_rfc3339};
