//! Wands entry point
//!
//! Runs a headless bot-vs-bot match and logs what happens.
//!
//! ```text
//! wands [TUNING_JSON] [TICKS] [SEED] [RECORDING_OUT]
//! ```
//!
//! Use `RUST_LOG=debug` to see releases, bounces and hits as they happen.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use glam::Vec2;
    use wands::Tuning;
    use wands::bot::Bot;
    use wands::consts::{MAX_AGENTS, SIM_DT};
    use wands::sim::{AgentConfig, ArenaEvent, EventSink, Recorder, TickInput, dispatch, replay};

    /// Tallies the match for the final summary
    #[derive(Debug, Default)]
    struct MatchLog {
        hits: [u32; MAX_AGENTS],
        top_speed: f32,
        bounces: u32,
        mutual: u32,
    }

    impl EventSink for MatchLog {
        fn on_event(&mut self, event: &ArenaEvent) {
            match *event {
                ArenaEvent::Hit {
                    attacker,
                    target,
                    speed,
                } => {
                    self.hits[attacker] += 1;
                    self.top_speed = self.top_speed.max(speed);
                    log::info!("Agent {attacker} hit agent {target} (speed {speed:.2})");
                }
                ArenaEvent::Bounce { agent, wall, .. } => {
                    self.bounces += 1;
                    log::debug!("Agent {agent} bounced off {wall:?}");
                }
                ArenaEvent::MutualContact => {
                    self.mutual += 1;
                    log::info!("Wands crossed");
                }
                ArenaEvent::CornerChanged { agent, corner } => {
                    log::trace!("Agent {agent} reached side {corner}");
                }
                ArenaEvent::ReleaseEnded { .. } | ArenaEvent::HitStop { .. } => {}
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let args: Vec<String> = std::env::args().skip(1).collect();

        let tuning = match args.first().filter(|a| !a.is_empty() && a.as_str() != "-") {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let ticks: u64 = args.get(1).map(|s| s.parse::<u64>()).transpose()?.unwrap_or(3600);
        let seed: u64 = args.get(2).map(|s| s.parse::<u64>()).transpose()?.unwrap_or(0);

        let mut recorder = Recorder::new(tuning)?;
        for (index, progress, dir) in [(0, 0.125, Vec2::X), (1, 0.625, Vec2::NEG_X)] {
            recorder.join(AgentConfig {
                index,
                initial_progress: progress,
                initial_offset_direction: dir,
                initial_offset_length: 0.3,
            })?;
        }

        let mut bots: Vec<Bot> = (0..MAX_AGENTS)
            .map(|i| Bot::new(i, seed.wrapping_add(i as u64)))
            .collect();
        let mut match_log = MatchLog::default();

        log::info!("Running {ticks} ticks with seed {seed}");
        for _ in 0..ticks {
            let mut input = TickInput::default();
            for bot in &mut bots {
                input.agents[bot.index()] = bot.tick(SIM_DT);
            }

            let events = recorder.step(&input, SIM_DT);
            dispatch(&events, &mut match_log);
        }

        let expected = recorder.outcome();
        let recording = recorder.finish();
        if replay(&recording)? == expected {
            log::info!("Replay matches the live run");
        } else {
            log::warn!("Replay diverged from the live run");
        }

        if let Some(path) = args.get(3) {
            std::fs::write(path, recording.to_json()?)?;
            log::info!("Saved recording to {path}");
        }

        println!(
            "hits {}-{}, top speed {:.2}, {} bounces, {} crossings",
            match_log.hits[0],
            match_log.hits[1],
            match_log.top_speed,
            match_log.bounces,
            match_log.mutual
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Wands (headless) starting...");

    if let Err(err) = headless::run() {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is used as a library on the web; there is no entry point
}
