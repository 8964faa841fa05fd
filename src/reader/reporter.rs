use std::sync::Arc;

use tokio::{sync::mpsc::UnboundedReceiver, task::JoinHandle};

use super::{cache::PageCache, session::ProgressReport};

/// Where progress reports go, normally the HTTP API.
#[async_trait::async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, report: &ProgressReport) -> anyhow::Result<()>;
}

/// Drains reports in order. A report is sent once; failures are logged and dropped.
pub struct ProgressReporter<S> {
    sink: S,
    cache: Arc<dyn PageCache>,
}

impl<S: ProgressSink + 'static> ProgressReporter<S> {
    pub fn new(sink: S, cache: Arc<dyn PageCache>) -> Self {
        Self { sink, cache }
    }

    /// Run until every sender is dropped.
    pub async fn run(self, mut reports: UnboundedReceiver<ProgressReport>) {
        while let Some(report) = reports.recv().await {
            match self.sink.report(&report).await {
                Ok(()) => {
                    tracing::debug!(
                        title = %report.title,
                        page = report.current_page,
                        pct = report.percentage_read,
                        "progress saved"
                    );
                    self.cache.remember(&report.title, report.current_page as usize);
                }
                Err(e) => {
                    tracing::warn!(
                        error = %format!("{:?}", e),
                        title = %report.title,
                        page = report.current_page,
                        "failed to save progress"
                    );
                }
            }
        }
        tracing::debug!("progress reporter finished");
    }

    pub fn spawn(self, reports: UnboundedReceiver<ProgressReport>) -> JoinHandle<()> {
        tokio::spawn(self.run(reports))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::sync::mpsc;

    use super::*;
    use crate::reader::{MemoryPageCache, ReaderSession};

    /// Records reports; fails for titles listed in `reject`.
    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<ProgressReport>>,
        reject: Vec<String>,
    }

    #[async_trait::async_trait]
    impl ProgressSink for Arc<RecordingSink> {
        async fn report(&self, report: &ProgressReport) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(report.clone());
            if self.reject.contains(&report.title) {
                anyhow::bail!("server unavailable");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn successful_reports_update_the_local_cache() {
        let sink = Arc::new(RecordingSink::default());
        let cache = Arc::new(MemoryPageCache::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ProgressReporter::new(sink.clone(), cache.clone()).spawn(rx);

        let text = vec!["word"; 600].join(" ");
        let mut session = ReaderSession::open("a@x.com", "Emma", None, &text, &*cache, tx);
        session.next_page();
        session.next_page();
        session.previous_page();
        drop(session);
        handle.await.unwrap();

        let seen = sink.seen.lock().unwrap();
        let pages: Vec<u32> = seen.iter().map(|r| r.current_page).collect();
        assert_eq!(pages, [1, 2, 1]);
        assert_eq!(cache.last_page("Emma"), Some(1));
    }

    #[tokio::test]
    async fn failed_reports_are_dropped_and_the_loop_continues() {
        let sink = Arc::new(RecordingSink {
            reject: vec!["Dracula".into()],
            ..Default::default()
        });
        let cache = Arc::new(MemoryPageCache::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ProgressReporter::new(sink.clone(), cache.clone()).spawn(rx);

        let text = vec!["word"; 600].join(" ");
        let mut dracula =
            ReaderSession::open("a@x.com", "Dracula", None, &text, &*cache, tx.clone());
        let mut emma = ReaderSession::open("a@x.com", "Emma", None, &text, &*cache, tx);
        dracula.next_page();
        emma.next_page();
        drop(dracula);
        drop(emma);
        handle.await.unwrap();

        assert_eq!(sink.seen.lock().unwrap().len(), 2);
        assert_eq!(cache.last_page("Dracula"), None);
        assert_eq!(cache.last_page("Emma"), Some(1));
    }
}
