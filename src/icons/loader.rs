//! Icon loading - the terminal's stand-in for an `<img>` load.
//!
//! A terminal cannot decode SVG, so a candidate counts as loaded when its URL
//! answers with a success status. Probes run as tokio tasks; outcomes come
//! back to the UI thread over a channel and are drained once per frame.
//!
//! ```text
//! UI thread                         tokio runtime
//! ─────────                         ─────────────
//! loader.request(url) ──spawn──▶    probe.probe(url)
//!                                        │
//! loader.poll() ◀──── mpsc ──────── (url, outcome)
//! ```
//!
//! Outcomes are cached per URL, so repeated copies of the same technology
//! cost one request.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use async_trait::async_trait;
use tokio::runtime::Handle;

use crate::config::ResolverConfig;
use crate::error::{Error, Result};

// =============================================================================
// PROBE
// =============================================================================

/// Checks whether an icon URL can be displayed.
#[async_trait]
pub trait IconProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<()>;
}

/// Probes icon URLs with a GET request.
#[derive(Debug, Clone)]
pub struct HttpIconProbe {
    client: reqwest::Client,
}

impl HttpIconProbe {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("skill-marquee/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IconProbe for HttpIconProbe {
    async fn probe(&self, url: &str) -> Result<()> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Result of loading one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

/// A settled load, ready to apply to slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEvent {
    pub url: String,
    pub outcome: LoadOutcome,
}

/// Deduplicating, caching front for an [`IconProbe`].
///
/// Lives on the UI thread; only the probes themselves run on the runtime.
pub struct IconLoader {
    probe: Arc<dyn IconProbe>,
    handle: Handle,
    tx: Sender<LoadEvent>,
    rx: Receiver<LoadEvent>,
    in_flight: HashSet<String>,
    settled: HashMap<String, LoadOutcome>,
    /// Cached outcomes handed out by `request`, delivered on the next `poll`.
    replay: Vec<LoadEvent>,
}

impl IconLoader {
    pub fn new(probe: impl IconProbe + 'static, handle: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            probe: Arc::new(probe),
            handle,
            tx,
            rx,
            in_flight: HashSet::new(),
            settled: HashMap::new(),
            replay: Vec::new(),
        }
    }

    /// Loader probing over HTTP.
    pub fn http(config: &ResolverConfig, handle: Handle) -> Result<Self> {
        Ok(Self::new(HttpIconProbe::new(config)?, handle))
    }

    /// Ask for `url` to be loaded.
    ///
    /// Already-settled URLs are replayed on the next [`poll`](Self::poll)
    /// without a new request; in-flight URLs are not requested twice.
    pub fn request(&mut self, url: &str) {
        if let Some(outcome) = self.settled.get(url) {
            self.replay.push(LoadEvent {
                url: url.to_string(),
                outcome: *outcome,
            });
            return;
        }
        if !self.in_flight.insert(url.to_string()) {
            return;
        }

        let probe = self.probe.clone();
        let tx = self.tx.clone();
        let url = url.to_string();
        self.handle.spawn(async move {
            let outcome = match probe.probe(&url).await {
                Ok(()) => LoadOutcome::Loaded,
                Err(err) => {
                    tracing::debug!(%url, error = %err, "icon candidate failed to load");
                    LoadOutcome::Failed
                }
            };
            // Receiver gone means the loader was dropped; nothing to report to.
            let _ = tx.send(LoadEvent { url, outcome });
        });
    }

    /// Drain every outcome that has arrived since the last poll.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = std::mem::take(&mut self.replay);
        while let Ok(event) = self.rx.try_recv() {
            self.in_flight.remove(&event.url);
            self.settled.insert(event.url.clone(), event.outcome);
            events.push(event);
        }
        events
    }

    /// Cached outcome for `url`, if it has settled.
    pub fn outcome(&self, url: &str) -> Option<LoadOutcome> {
        self.settled.get(url).copied()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl std::fmt::Debug for IconLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconLoader")
            .field("in_flight", &self.in_flight.len())
            .field("settled", &self.settled.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Probe that fails for URLs containing "bad" and records every call.
    #[derive(Default)]
    struct FakeProbe {
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl IconProbe for FakeProbe {
        async fn probe(&self, url: &str) -> Result<()> {
            self.calls.lock().unwrap().push(url.to_string());
            if url.contains("bad") {
                Err(Error::Status {
                    url: url.to_string(),
                    status: 404,
                })
            } else {
                Ok(())
            }
        }
    }

    fn poll_until(loader: &mut IconLoader, count: usize) -> Vec<LoadEvent> {
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut events = Vec::new();
        while events.len() < count && Instant::now() < deadline {
            events.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_request_and_poll() {
        let rt = runtime();
        let mut loader = IconLoader::new(FakeProbe::default(), rt.handle().clone());

        loader.request("https://cdn/good");
        loader.request("https://cdn/bad");

        let mut events = poll_until(&mut loader, 2);
        events.sort_by(|a, b| a.url.cmp(&b.url));
        assert_eq!(
            events,
            vec![
                LoadEvent {
                    url: "https://cdn/bad".to_string(),
                    outcome: LoadOutcome::Failed
                },
                LoadEvent {
                    url: "https://cdn/good".to_string(),
                    outcome: LoadOutcome::Loaded
                },
            ]
        );
        assert_eq!(loader.in_flight(), 0);
        assert_eq!(loader.outcome("https://cdn/bad"), Some(LoadOutcome::Failed));
    }

    #[test]
    fn test_duplicate_requests_probe_once() {
        let rt = runtime();
        let probe = FakeProbe::default();
        let calls = probe.calls.clone();
        let mut loader = IconLoader::new(probe, rt.handle().clone());

        for _ in 0..5 {
            loader.request("https://cdn/python");
        }
        let events = poll_until(&mut loader, 1);
        assert_eq!(events.len(), 1);

        // Settled URLs are replayed from the cache
        loader.request("https://cdn/python");
        let replayed = loader.poll();
        assert_eq!(replayed.len(), 1);
        assert_eq!(replayed[0].outcome, LoadOutcome::Loaded);

        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
