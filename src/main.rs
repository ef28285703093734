//! Downbeat entry point
//!
//! Natively this is a headless driver: it plays one level at the logical tick
//! rate with the autopilot (or no input at all), collects the tones, and
//! reports how the run ended. The browser build drives [`Game`] from its own
//! frame loop and has no binary entry point.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use downbeat::audio::{Mixer, ToneKind, ToneLog};
    use downbeat::consts::TICK_RATE_HZ;
    use downbeat::sim::autopilot;
    use downbeat::{Game, GamePhase, LevelId, Settings};

    /// Headless Downbeat runner
    #[derive(Parser, Debug)]
    #[command(name = "downbeat", version, about)]
    pub struct Args {
        /// Level id (0 = Maple Leaf Rag, 1 = Pencil Drop); overrides the config file
        #[arg(short, long)]
        level: Option<u8>,

        /// RNG seed; overrides the config file
        #[arg(short, long)]
        seed: Option<u64>,

        /// Settings JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Give up after this many ticks
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u64,

        /// Let the demo autopilot play instead of never pressing
        #[arg(short, long)]
        autoplay: bool,

        /// Print the final snapshot as JSON
        #[arg(long)]
        dump_snapshot: bool,
    }

    pub fn run(args: Args) -> Result<()> {
        let settings = Settings::load(args.config.as_deref());

        let level = match args.level {
            Some(id) => LevelId::try_from(id)?,
            None => settings.level,
        };
        let mut game = match args.seed.or(settings.seed) {
            Some(seed) => Game::new(seed),
            None => Game::from_entropy(),
        };
        game.start(level)?;

        let mut mixer = Mixer::new(ToneLog::new(), &settings);
        let mut ticks = 0u64;
        while game.phase() == GamePhase::Running {
            if ticks >= args.max_ticks {
                bail!("run still going after {} ticks", args.max_ticks);
            }
            let held = args.autoplay && game.run().is_some_and(autopilot::action);
            game.tick_into(held, &mut mixer);
            ticks += 1;
        }

        let snapshot = game.snapshot();
        let tones = mixer.into_inner();
        log::info!(
            "{} {:?} after {} ticks ({:.1}s) with {} hearts{}",
            level.as_str(),
            game.phase(),
            ticks,
            ticks as f64 / TICK_RATE_HZ as f64,
            snapshot.hearts,
            if game.is_perfect() { ", perfect" } else { "" }
        );
        log::info!(
            "Tones: {} melody, {} dud, {} pickup",
            tones.count(ToneKind::Melody),
            tones.count(ToneKind::Dud),
            tones.count(ToneKind::Pickup)
        );

        if args.dump_snapshot {
            let json = serde_json::to_string_pretty(snapshot).context("failed to encode snapshot")?;
            println!("{json}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Downbeat (native) starting...");

    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Game` directly
}
