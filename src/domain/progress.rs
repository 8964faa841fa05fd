//! Progress bookkeeping over a user's library.
//!
//! These functions only touch the in-memory entry list; loading and saving
//! the owning user record is the caller's job.

use super::models::LibraryEntry;

/// A validated progress report for one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub title: String,
    pub image: Option<String>,
    pub current_page: u32,
    pub percentage_read: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Update the first entry whose title matches exactly, or append a new one.
///
/// An existing entry keeps its image; only the page and percentage move.
pub fn apply_progress(library: &mut Vec<LibraryEntry>, update: ProgressUpdate) -> UpsertOutcome {
    match library.iter_mut().find(|entry| entry.title == update.title) {
        Some(entry) => {
            entry.current_page = update.current_page;
            entry.percentage_read = update.percentage_read;
            UpsertOutcome::Updated
        }
        None => {
            library.push(LibraryEntry {
                title: update.title,
                image: update.image,
                current_page: update.current_page,
                percentage_read: update.percentage_read,
            });
            UpsertOutcome::Created
        }
    }
}

/// The wishlist: entries below 100%, in stored order.
pub fn incomplete(library: &[LibraryEntry]) -> Vec<LibraryEntry> {
    library
        .iter()
        .filter(|entry| !entry.is_complete())
        .cloned()
        .collect()
}
