//! Headless playback demo.
//!
//! ```text
//! cargo run --example headless -- "hello, how are you"
//! cargo run --example headless -- --assets public "thank you"
//! ```
//!
//! Without `--assets` the avatar is the built-in mixamo rig and clip models
//! are missing, so clip units report an error and are skipped.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use signverse::{
    AssetLoader, Clock, GltfLoader, HeadlessRenderer, MemoryLoader, PlayerConfig, Prefab, SignPlayer,
    VirtualClock,
};

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 60 * 120;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let assets = match args.iter().position(|arg| arg == "--assets") {
        Some(index) if index + 1 < args.len() => {
            let root = args.remove(index + 1);
            args.remove(index);
            Some(root)
        }
        Some(_) => anyhow::bail!("--assets needs a directory"),
        None => None,
    };
    let text = if args.is_empty() {
        "hello, how are you".to_string()
    } else {
        args.join(" ")
    };

    let config = PlayerConfig::default();
    match assets {
        Some(root) => run(config, GltfLoader::new(root), &text),
        None => {
            let avatar = config.avatar_model.clone();
            run(config, MemoryLoader::new().with(avatar, Prefab::mixamo_rig("ybot")), &text)
        }
    }
}

fn run(config: PlayerConfig, loader: impl AssetLoader + 'static, text: &str) -> anyhow::Result<()> {
    let clock = VirtualClock::new();
    let renderer = HeadlessRenderer::new();
    let mut player = SignPlayer::new(config, loader, renderer.clone(), clock.clone());

    let done = Rc::new(Cell::new(false));
    let flag = done.clone();
    player.on_complete(move || flag.set(true));
    player.on_debug_event(|event| println!("{event}"));

    player.play_text(text);
    if player.queue_len() == 0 {
        player.play_phrases(text);
    }
    if player.queue_len() == 0 {
        log::warn!("Nothing to sign for {text:?}");
        return Ok(());
    }

    let mut last_label = None;
    for _ in 0..MAX_FRAMES {
        clock.advance(FRAME);
        player.update();
        // Real clips load on a worker thread.
        std::thread::sleep(Duration::from_millis(1));

        let label = player.current_unit_label();
        if label != last_label {
            if let Some(label) = &label {
                log::info!("[{}/{}] {label}", player.queue_index() + 1, player.queue_len());
            }
            last_label = label;
        }
        if done.get() {
            break;
        }
    }

    let stats = renderer.stats();
    log::info!(
        "Finished after {:.1}s of playback, {} frames rendered",
        clock.now().as_secs_f32(),
        stats.frames_rendered
    );
    if !done.get() {
        anyhow::bail!("playback did not complete");
    }

    player.unmount();
    Ok(())
}
