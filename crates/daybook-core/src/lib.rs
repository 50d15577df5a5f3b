//! Domain types and pure computations for the journal.
//!
//! Nothing here performs I/O. Store access lives in `daybook-store`; the
//! session, lock gate and views live in `daybook-session`.

pub mod calendar;
pub mod credentials;
pub mod display;
pub mod entry;
pub mod error;
pub mod filter;
pub mod mood;
pub mod stats;
pub mod streak;
pub mod todo;

pub use calendar::{MarkedDate, date_key, marked_dates, mood_by_date, parse_date_key};
pub use credentials::Credentials;
pub use entry::{EntryDraft, EntryId, JournalEntry, UserId, resolve_prefix};
pub use error::JournalError;
pub use filter::{EntryFilter, filter_entries};
pub use mood::Mood;
pub use stats::mood_counts;
pub use streak::compute_streak;
pub use todo::{TodoCounts, TodoDraft, TodoId, TodoItem, TodoView, count_todos, filter_todos};
