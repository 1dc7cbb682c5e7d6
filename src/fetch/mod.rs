//! Concurrent content fetching.
//!
//! Fetches raw contents for a set of selected paths through a source,
//! capping the number of simultaneous in-flight requests and isolating
//! per-path failures. The cache fills incrementally as fetches resolve;
//! one failed path never aborts its siblings.

use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::source::Source;

/// Default cap on simultaneous in-flight fetches. Conservative for the
/// GitHub raw host's rate limits.
pub const DEFAULT_MAX_CONCURRENCY: usize = 20;

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub max_concurrency: usize,
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { max_concurrency: DEFAULT_MAX_CONCURRENCY, show_progress: false }
    }
}

/// What a [`fetch_many`] call did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub fetched: usize,
    /// Paths skipped because the cache already held them.
    pub skipped: usize,
    /// Paths whose fetch failed; they stay absent from the cache until a
    /// later cycle retries them.
    pub failed: Vec<String>,
}

/// Fetch every path not already cached, writing contents into `cache` as
/// each fetch resolves. No automatic retries.
pub async fn fetch_many<S>(
    paths: &[String],
    source: &S,
    cache: &mut HashMap<String, String>,
    options: &FetchOptions,
) -> FetchOutcome
where
    S: Source + ?Sized,
{
    let todo: Vec<&String> = paths.iter().filter(|p| !cache.contains_key(*p)).collect();
    let mut outcome =
        FetchOutcome { skipped: paths.len() - todo.len(), ..FetchOutcome::default() };
    if todo.is_empty() {
        return outcome;
    }

    debug!(pending = todo.len(), skipped = outcome.skipped, "starting content fetch");

    let bar = if options.show_progress {
        let bar = ProgressBar::new(todo.len() as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} {pos}/{len} files {wide_bar} {elapsed}")
        {
            bar.set_style(style);
        }
        Some(bar)
    } else {
        None
    };

    let concurrency = options.max_concurrency.max(1);
    let mut results = stream::iter(todo)
        .map(|path| async move { (path.clone(), source.fetch_content(path).await) })
        .buffer_unordered(concurrency);

    while let Some((path, result)) = results.next().await {
        if let Some(bar) = &bar {
            bar.inc(1);
        }
        match result {
            Ok(content) => {
                cache.insert(path, content);
                outcome.fetched += 1;
            }
            Err(e) => {
                warn!(%path, error = %e, "content fetch failed");
                outcome.failed.push(path);
            }
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use crate::tree::Blob;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Source stub that fails configured paths and counts calls plus the
    /// peak number of concurrent fetches.
    #[derive(Default)]
    struct StubSource {
        failing: Vec<String>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak_in_flight: Mutex<usize>,
    }

    impl StubSource {
        fn failing(paths: &[&str]) -> Self {
            Self { failing: paths.iter().map(|p| p.to_string()).collect(), ..Self::default() }
        }
    }

    #[async_trait]
    impl Source for StubSource {
        async fn list_blobs(&self) -> Result<Vec<Blob>, SourceError> {
            Ok(Vec::new())
        }

        async fn fetch_content(&self, path: &str) -> Result<String, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            {
                let mut peak = self.peak_in_flight.lock().unwrap();
                *peak = (*peak).max(current);
            }
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.iter().any(|p| p == path) {
                return Err(SourceError::Fetch {
                    path: path.to_string(),
                    reason: "stubbed failure".to_string(),
                });
            }
            Ok(format!("content of {path}"))
        }
    }

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|p| p.to_string()).collect()
    }

    #[tokio::test]
    async fn one_failing_path_does_not_abort_siblings() {
        let source = StubSource::failing(&["b.txt"]);
        let mut cache = HashMap::new();

        let outcome = fetch_many(
            &paths(&["a.txt", "b.txt", "c.txt"]),
            &source,
            &mut cache,
            &FetchOptions::default(),
        )
        .await;

        assert_eq!(outcome.fetched, 2);
        assert_eq!(outcome.failed, vec!["b.txt"]);
        assert_eq!(cache.get("a.txt").map(String::as_str), Some("content of a.txt"));
        assert_eq!(cache.get("c.txt").map(String::as_str), Some("content of c.txt"));
        assert!(!cache.contains_key("b.txt"));
    }

    #[tokio::test]
    async fn cached_paths_are_never_refetched() {
        let source = StubSource::default();
        let mut cache = HashMap::new();
        let set = paths(&["a.txt", "b.txt"]);

        let first = fetch_many(&set, &source, &mut cache, &FetchOptions::default()).await;
        assert_eq!(first.fetched, 2);

        let second = fetch_many(&set, &source, &mut cache, &FetchOptions::default()).await;
        assert_eq!(second.fetched, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_the_cap() {
        let source = StubSource::default();
        let mut cache = HashMap::new();
        let set: Vec<String> = (0..50).map(|i| format!("file-{i}.txt")).collect();

        let options = FetchOptions { max_concurrency: 4, show_progress: false };
        let outcome = fetch_many(&set, &source, &mut cache, &options).await;

        assert_eq!(outcome.fetched, 50);
        assert!(*source.peak_in_flight.lock().unwrap() <= 4);
    }

    #[tokio::test]
    async fn failed_paths_are_retried_on_the_next_cycle() {
        let source = StubSource::failing(&["a.txt"]);
        let mut cache = HashMap::new();
        let set = paths(&["a.txt"]);

        let first = fetch_many(&set, &source, &mut cache, &FetchOptions::default()).await;
        assert_eq!(first.failed, vec!["a.txt"]);

        // Still absent from the cache, so a later call attempts it again.
        let second = fetch_many(&set, &source, &mut cache, &FetchOptions::default()).await;
        assert_eq!(second.skipped, 0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
