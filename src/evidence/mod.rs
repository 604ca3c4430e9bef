//! Evidence entries and the log that owns them

pub mod entry;
pub mod log;
pub mod metadata;

pub use entry::{EntryId, EntrySnapshot, EvidenceEntry};
pub use self::log::{EvidenceLog, LogSnapshot};
pub use metadata::{SessionInfo, Step};
