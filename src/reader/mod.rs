//! Client-side reader state: pagination, page navigation and progress reporting.
//!
//! A [`ReaderSession`] never waits on the network. Page turns push a
//! [`ProgressReport`] onto a channel that a [`ProgressReporter`] drains in the
//! background.

mod cache;
mod pagination;
mod reporter;
mod session;

pub use cache::{MemoryPageCache, PageCache};
pub use pagination::{WORDS_PER_PAGE, paginate, percentage_read};
pub use reporter::{ProgressReporter, ProgressSink};
pub use session::{ProgressReport, ReaderSession};
