//! End-to-end marquee flow with in-memory index and probe.
//!
//! Drives the same loop the demo runs (snapshot sync, icon requests, load
//! outcomes, frames, pointer input, painting) without touching the network
//! or the terminal.
//!
//! Run with: cargo test --test marquee_flow

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Runtime;

use skill_marquee::icons::{IconLoader, IconProbe, IndexSource};
use skill_marquee::state::pointer::MouseEvent;
use skill_marquee::{
    ClipRect, Error, FrameBuffer, IconIndex, IconIndexCache, IconIndexEntry, IconResolver,
    IconRoute, IconStatus, IndexSnapshot, Marquee, MarqueeConfig, Result,
};

const CDN: &str = "https://cdn.example";

// =============================================================================
// FAKES
// =============================================================================

struct FakeSource {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl IndexSource for FakeSource {
    async fn fetch(&self) -> Result<IconIndex> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Status {
                url: "https://index.example".into(),
                status: 503,
            });
        }
        Ok(vec![
            IconIndexEntry::new(
                "Amazon Web Services",
                IconRoute::Single("https://x/aws.svg".into()),
            ),
            IconIndexEntry::new(
                "Java",
                IconRoute::Themed {
                    light: "https://x/java-light.svg".into(),
                    dark: Some("https://x/java-dark.svg".into()),
                },
            ),
        ])
    }
}

/// Fails the URLs it is given, loads everything else.
struct FakeProbe {
    broken: Vec<String>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl IconProbe for FakeProbe {
    async fn probe(&self, url: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.iter().any(|b| b == url) {
            return Err(Error::Status {
                url: url.to_string(),
                status: 404,
            });
        }
        Ok(())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn cache(fail: bool) -> (IconIndexCache, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = FakeSource {
        fail,
        calls: calls.clone(),
    };
    (IconIndexCache::new(source), calls)
}

fn loader(runtime: &Runtime, broken: &[&str]) -> (IconLoader, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let probe = FakeProbe {
        broken: broken.iter().map(|s| s.to_string()).collect(),
        calls: calls.clone(),
    };
    (IconLoader::new(probe, runtime.handle().clone()), calls)
}

fn marquee(names: &[&str]) -> Marquee {
    let config = MarqueeConfig {
        item_margin: 1,
        gradient_width: 0,
        ..MarqueeConfig::with_technologies(names.iter().copied())
    };
    Marquee::new(config, IconResolver::with_cdn_base(CDN)).unwrap()
}

/// Run the request/poll cycle until no item waits on a load.
fn settle(marquee: &mut Marquee, loader: &mut IconLoader) {
    for _ in 0..400 {
        marquee.request_icons(loader);
        let events = loader.poll();
        marquee.apply_loads(events);
        if marquee.pending_requests().is_empty() {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("icons never settled: {:?}", marquee.pending_requests());
}

fn status_of(marquee: &Marquee, name: &str) -> (IconStatus, Option<String>) {
    let item = marquee
        .items()
        .iter()
        .find(|item| item.name() == name)
        .unwrap();
    (item.slot().status(), item.slot().current().map(str::to_string))
}

// =============================================================================
// TESTS
// =============================================================================

#[test]
fn test_full_resolution_flow() {
    let runtime = Runtime::new().unwrap();
    let (cache, fetches) = cache(false);
    let gnubash = format!("{CDN}/gnubash");
    let (mut loader, _) = loader(&runtime, &[gnubash.as_str()]);

    let mut m = marquee(&["AWS", "Bash", "Python", "Java", "Convex"]);

    // Before the index: CDN items resolve, curated ones are label-only
    assert_eq!(status_of(&m, "AWS").0, IconStatus::Hidden);
    assert_eq!(status_of(&m, "Python").0, IconStatus::Pending);
    settle(&mut m, &mut loader);
    assert_eq!(
        status_of(&m, "Bash"),
        (IconStatus::Loaded, Some(format!("{CDN}/bash")))
    );

    let snapshot = runtime.block_on(cache.load());
    assert!(matches!(snapshot, IndexSnapshot::Ready(_)));
    assert!(m.sync_index(&cache.snapshot()).unwrap());
    settle(&mut m, &mut loader);

    assert_eq!(
        status_of(&m, "AWS"),
        (IconStatus::Loaded, Some("https://x/aws.svg".into()))
    );
    assert_eq!(
        status_of(&m, "Java"),
        (IconStatus::Loaded, Some("https://x/java-light.svg".into()))
    );
    assert_eq!(status_of(&m, "Convex"), (IconStatus::Hidden, None));
    assert_eq!(
        status_of(&m, "Python"),
        (IconStatus::Loaded, Some(format!("{CDN}/python")))
    );

    // A second marquee shares the cached index
    let mut other = marquee(&["AWS"]);
    runtime.block_on(cache.load());
    other.sync_index(&cache.snapshot()).unwrap();
    assert_eq!(other.pending_requests(), vec!["https://x/aws.svg".to_string()]);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_index_degrades_curated_only() {
    let runtime = Runtime::new().unwrap();
    let (cache, fetches) = cache(true);
    let (mut loader, _) = loader(&runtime, &[]);

    let mut m = marquee(&["AWS", "Git"]);
    let width_before = m.layout().width;

    assert_eq!(runtime.block_on(cache.load()), IndexSnapshot::Failed);
    m.sync_index(&cache.snapshot()).unwrap();
    settle(&mut m, &mut loader);

    assert_eq!(status_of(&m, "AWS"), (IconStatus::Hidden, None));
    assert_eq!(status_of(&m, "Git").0, IconStatus::Loaded);
    assert_eq!(m.layout().width, width_before);

    // Failure is permanent for the cache
    runtime.block_on(cache.load());
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn test_repeated_items_probe_once() {
    let runtime = Runtime::new().unwrap();
    let (mut loader, probes) = loader(&runtime, &[]);

    let mut m = marquee(&["Git", "React", "Git", "React"]);
    settle(&mut m, &mut loader);

    assert_eq!(probes.load(Ordering::SeqCst), 2);
    assert!(
        m.items()
            .iter()
            .all(|item| item.slot().status() == IconStatus::Loaded)
    );
}

#[test]
fn test_every_candidate_failing_keeps_label() {
    let runtime = Runtime::new().unwrap();
    let broken = [format!("{CDN}/gnubash"), format!("{CDN}/bash")];
    let (mut loader, _) = loader(&runtime, &[broken[0].as_str(), broken[1].as_str()]);

    let mut m = marquee(&["Bash"]);
    m.set_region(ClipRect::new(0, 0, 40, 1));
    settle(&mut m, &mut loader);

    assert_eq!(status_of(&m, "Bash"), (IconStatus::Hidden, None));

    let mut buffer = FrameBuffer::new(40, 1);
    m.render(&mut buffer);
    let row = buffer.row_text(0);
    assert!(row.contains("Bash"));
    assert!(!row.contains('○') && !row.contains('●'));
}

#[test]
fn test_scroll_and_drag_stay_in_range() {
    let mut m = marquee(&["Python", "FastAPI", "C"]);
    m.set_region(ClipRect::new(0, 4, 60, 1));
    let width = m.layout().width;
    let in_range = |offset: f32| offset > -2.0 * width && offset <= 0.0;

    for _ in 0..500 {
        m.advance(1);
        assert!(in_range(m.scroll().offset()));
    }

    m.handle_mouse(&MouseEvent::down(30, 4));
    for x in (0..60).rev().chain(0..60) {
        m.handle_mouse(&MouseEvent::drag(x, 4));
        assert!(in_range(m.scroll().offset()));
    }
    m.handle_mouse(&MouseEvent::up(59, 4));
    assert!(m.scroll().direction() == skill_marquee::Direction::Right);

    let before = m.scroll().offset();
    m.advance(1);
    assert!(in_range(m.scroll().offset()));
    assert_ne!(before, m.scroll().offset());
}

#[test]
fn test_render_covers_viewport() {
    let mut m = marquee(&["C"]);
    m.set_region(ClipRect::new(0, 0, 80, 1));

    for frames in [0, 7, 31] {
        m.advance(frames);
        let mut buffer = FrameBuffer::new(80, 1);
        m.render(&mut buffer);
        // One pass is 5 cells; a full viewport shows 16 copies
        let copies = buffer.row_text(0).matches('C').count();
        assert!(copies >= 15, "only {copies} copies after {frames} frames");
    }
}
