//! Marquee Example - the skill marquee in a fullscreen terminal
//!
//! Fetches the icon index in the background, probes icon candidates, and
//! scrolls the default technologies across the middle of the screen. Drag
//! the row with the mouse to pan it; release to send it the way you dragged.
//!
//! Run with: cargo run --example marquee [settings.json]
//!
//! Quit with `q`, `Esc` or `Ctrl+C`. Logs go to `skill-marquee.log`
//! (filter with `RUST_LOG`, e.g. `RUST_LOG=skill_marquee=debug`).

use std::fs::File;
use std::io::{Write, stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use skill_marquee::state::input::{disable_mouse, enable_mouse};
use skill_marquee::{
    Attr, ClipRect, DiffRenderer, FrameBuffer, IconIndexCache, IconLoader, IconResolver,
    InputEvent, Marquee, MarqueeConfig, ResolverConfig, Result, Rgba, Settings, poll_event,
};

const LOG_FILE: &str = "skill-marquee.log";

fn main() -> Result<()> {
    init_logging()?;

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings {
            marquee: MarqueeConfig::default(),
            resolver: ResolverConfig::from_env()?,
        },
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    // One cache for the whole session; loading starts right away
    let cache = Arc::new(IconIndexCache::http(&settings.resolver)?);
    runtime.spawn({
        let cache = cache.clone();
        async move {
            cache.load().await;
        }
    });

    let mut loader = IconLoader::http(&settings.resolver, runtime.handle().clone())?;
    let mut marquee = Marquee::new(settings.marquee, IconResolver::new(&settings.resolver))?;

    let mut out = stdout();
    let mut renderer = DiffRenderer::new();

    enable_raw_mode()?;
    enable_mouse()?;
    renderer.enter_fullscreen(&mut out)?;

    let result = run(&mut marquee, &cache, &mut loader, &mut renderer, &mut out);

    // Restore the terminal even if the loop failed
    marquee.unmount();
    renderer.exit_fullscreen(&mut out)?;
    disable_mouse()?;
    disable_raw_mode()?;
    out.flush()?;

    result
}

fn run<W: Write>(
    marquee: &mut Marquee,
    cache: &IconIndexCache,
    loader: &mut IconLoader,
    renderer: &mut DiffRenderer,
    out: &mut W,
) -> Result<()> {
    let (width, height) = terminal::size()?;
    let mut buffer = FrameBuffer::with_background(width, height, marquee.config().style.background);
    marquee.mount(region_for(width, height));

    let frame_time = Duration::from_millis(1000 / marquee.config().fps.max(1) as u64);

    loop {
        while let Some(event) = poll_event(Duration::ZERO)? {
            match event {
                InputEvent::Key(key) if key.is_quit() => return Ok(()),
                InputEvent::Mouse(mouse) => {
                    marquee.handle_mouse(&mouse);
                }
                InputEvent::Resize(w, h) => {
                    buffer.resize(w, h);
                    marquee.set_region(region_for(w, h));
                    renderer.invalidate();
                }
                InputEvent::Key(_) | InputEvent::None => {}
            }
        }

        marquee.sync_index(&cache.snapshot())?;
        marquee.request_icons(loader);
        marquee.apply_loads(loader.poll());
        marquee.tick();

        buffer.clear_with_bg(marquee.config().style.background);
        draw_header(&mut buffer, marquee);
        marquee.render(&mut buffer);
        renderer.render(&buffer, out)?;

        std::thread::sleep(frame_time);
    }
}

/// Three rows centered vertically, full width.
fn region_for(width: u16, height: u16) -> ClipRect {
    ClipRect::new(0, height.saturating_sub(3) / 2, width, 3.min(height))
}

fn draw_header(buffer: &mut FrameBuffer, marquee: &Marquee) {
    let region = marquee.region();
    let Some(y) = region.y.checked_sub(2) else {
        return;
    };
    let title = "Skills & Technologies";
    let x = (buffer.width() as i32 - title.len() as i32) / 2;
    buffer.draw_text(x, y, title, Rgba::WHITE, None, Attr::BOLD, None);

    let hint = "drag to pan · q to quit";
    let x = (buffer.width() as i32 - hint.chars().count() as i32) / 2;
    buffer.draw_text(x, region.y + region.height + 1, hint, Rgba::GRAY, None, Attr::DIM, None);
}

fn init_logging() -> Result<()> {
    let file = File::create(LOG_FILE)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skill_marquee=info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();
    Ok(())
}
