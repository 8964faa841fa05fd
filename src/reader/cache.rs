use std::{collections::HashMap, sync::Mutex};

/// Device-local memory of the last page read per title.
pub trait PageCache: Send + Sync {
    fn last_page(&self, title: &str) -> Option<usize>;
    fn remember(&self, title: &str, page: usize);
}

#[derive(Debug, Default)]
pub struct MemoryPageCache {
    pages: Mutex<HashMap<String, usize>>,
}

impl PageCache for MemoryPageCache {
    fn last_page(&self, title: &str) -> Option<usize> {
        self.pages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(title)
            .copied()
    }

    fn remember(&self, title: &str, page: usize) {
        self.pages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(title.to_string(), page);
    }
}
