//! Nebula Course - headless course runner
//!
//! Scrolls through a level at a fixed speed, logging progression events, and
//! prints the final HUD snapshot as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nebula_course::course::{CourseState, tick};
use nebula_course::{HudSnapshot, LevelSource, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a Nebula Course level headlessly")]
struct Cli {
    /// Built-in level name (level1, test)
    #[arg(long, conflicts_with_all = ["file", "seed"])]
    level: Option<String>,
    /// JSON level file
    #[arg(long, conflicts_with = "seed")]
    file: Option<PathBuf>,
    /// Generate a course from this seed
    #[arg(long)]
    seed: Option<u64>,
    /// Sections in a generated course
    #[arg(long, default_value_t = 8)]
    sections: usize,
    /// Settings file
    #[arg(long, short = 'c', default_value = "nebula-course.json")]
    config: PathBuf,
    /// Pixels scrolled per tick
    #[arg(long)]
    speed: Option<i32>,
    /// Maximum ticks to run
    #[arg(long)]
    ticks: Option<u32>,
    /// Scroll back this many pixels every few ticks
    #[arg(long)]
    jitter: Option<i32>,
    /// Log a HUD line every N ticks
    #[arg(long)]
    hud_every: Option<u32>,
    /// Print the tile buffer when the run ends
    #[arg(long)]
    dump: bool,
    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(name) = &self.level {
            settings.level = LevelSource::Builtin(name.clone());
        }
        if let Some(path) = &self.file {
            settings.level = LevelSource::File(path.clone());
        }
        if let Some(seed) = self.seed {
            settings.level = LevelSource::Seed {
                seed,
                sections: self.sections,
            };
        }
        if let Some(speed) = self.speed {
            settings.scroll_speed = speed;
        }
        if let Some(ticks) = self.ticks {
            settings.max_ticks = ticks;
        }
        if let Some(jitter) = self.jitter {
            settings.jitter_px = jitter;
        }
        if let Some(every) = self.hud_every {
            settings.hud_interval = every;
        }
        settings.dump_tiles |= self.dump;
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config);
    cli.apply(&mut settings);
    if cli.save_config {
        settings
            .save(&cli.config)
            .with_context(|| format!("save settings to {}", cli.config.display()))?;
    }

    let catalog = settings
        .level
        .load()
        .with_context(|| format!("load level {:?}", settings.level))?;
    log::info!(
        "Nebula Course starting '{}' ({} segments, {} blocks)",
        catalog.name(),
        catalog.segment_count(),
        catalog.total_blocks()
    );

    let mut state = CourseState::new(catalog);
    let mut scroll = 0i32;
    let mut ticks = 0u32;

    while ticks < settings.max_ticks && !state.is_complete() {
        ticks += 1;
        scroll = scroll.saturating_add(settings.scroll_step(ticks));
        let report = tick(&mut state, scroll);

        if report.advance.segments_entered > 0 {
            let seg = state.progression.current_segment();
            log::info!(
                "tick {}: segment {} {} w{}",
                ticks,
                state.progression.segment_index(),
                seg.lanes().as_str(),
                seg.width()
            );
        }
        if report.advance.transition_entered {
            log::info!("tick {}: transition start", ticks);
        }
        if report.advance.transition_cleared {
            log::info!("tick {}: transition end", ticks);
        }
        for hit in &report.advance.activated {
            log::info!(
                "tick {}: object {} {:?} {:?} at block {}",
                ticks,
                hit.index,
                hit.object.kind,
                hit.object.lane,
                hit.world_block
            );
        }
        if report.advance.completed {
            log::info!("tick {}: level complete", ticks);
        }
        if settings.hud_interval > 0 && ticks % settings.hud_interval == 0 {
            log::info!("{}", HudSnapshot::capture(&state));
        }
    }

    if !state.is_complete() {
        log::warn!("Stopped after {} ticks without finishing", ticks);
    }

    if settings.dump_tiles {
        print!("{}", state.sync.to_ascii());
    }

    let hud = HudSnapshot::capture(&state);
    println!(
        "{}",
        serde_json::to_string_pretty(&hud).context("serialize HUD snapshot")?
    );
    Ok(())
}
