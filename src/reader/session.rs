use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use super::{
    cache::PageCache,
    pagination::{WORDS_PER_PAGE, paginate, percentage_read},
};

/// Body of `POST /api/progress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub email: String,
    pub title: String,
    pub image: Option<String>,
    pub current_page: u32,
    pub percentage_read: u8,
}

/// One open book: its pages and where the reader is.
#[derive(Debug)]
pub struct ReaderSession {
    email: String,
    title: String,
    image: Option<String>,
    pages: Vec<String>,
    current: usize,
    reports: UnboundedSender<ProgressReport>,
}

impl ReaderSession {
    /// Paginate `text` and restore the cached page for `title`, if any.
    ///
    /// A cached page past the end (e.g. after re-pagination) lands on the last page.
    pub fn open(
        email: impl Into<String>,
        title: impl Into<String>,
        image: Option<String>,
        text: &str,
        cache: &dyn PageCache,
        reports: UnboundedSender<ProgressReport>,
    ) -> Self {
        let title = title.into();
        let pages = paginate(text, WORDS_PER_PAGE);
        let last = pages.len().saturating_sub(1);
        let current = cache.last_page(&title).map_or(0, |page| page.min(last));
        tracing::debug!(%title, pages = pages.len(), current, "opened reader session");
        ReaderSession {
            email: email.into(),
            title,
            image,
            pages,
            current,
            reports,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn current_text(&self) -> Option<&str> {
        self.pages.get(self.current).map(String::as_str)
    }

    pub fn percentage_read(&self) -> u8 {
        percentage_read(self.current, self.pages.len())
    }

    /// Advance one page. Returns false, without reporting, on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current + 1 >= self.pages.len() {
            return false;
        }
        self.current += 1;
        self.report();
        true
    }

    /// Go back one page. Returns false, without reporting, on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.report();
        true
    }

    fn report(&self) {
        let report = ProgressReport {
            email: self.email.clone(),
            title: self.title.clone(),
            image: self.image.clone(),
            current_page: u32::try_from(self.current).unwrap_or(u32::MAX),
            percentage_read: self.percentage_read(),
        };
        if self.reports.send(report).is_err() {
            tracing::warn!(
                title = %self.title,
                page = self.current,
                "progress reporter is gone, dropping report"
            );
        }
    }
}
