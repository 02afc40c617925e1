//! Fruit Grab headless driver
//!
//! Runs one session at ~60 Hz with jittered frame times and a demo player,
//! logs what happens, and prints the session summary as JSON.
//!
//! Usage: fruit-grab [--seed N] [--config settings.json] [--steps N] [--step-secs S]

use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use fruit_grab::{
    Catalog, GameEvent, GamePhase, GameSession, GrabOutcome, ObjectId, Settings, Snapshot,
};

/// Nominal frame time
const FRAME_DT: f64 = 1.0 / 60.0;
/// Safety cap so a bad config can't spin forever
const MAX_FRAMES: u32 = 60 * 60 * 30;

#[derive(Debug, Default)]
struct Args {
    seed: Option<u64>,
    config: Option<PathBuf>,
    steps: Option<u32>,
    step_secs: Option<f64>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("missing value for {}", flag));
        match flag.as_str() {
            "--seed" => args.seed = Some(value()?.parse()?),
            "--config" => args.config = Some(PathBuf::from(value()?)),
            "--steps" => args.steps = Some(value()?.parse()?),
            "--step-secs" => args.step_secs = Some(value()?.parse()?),
            other => return Err(format!("unknown argument: {}", other).into()),
        }
    }
    Ok(args)
}

/// Demo player: waits a reaction delay after a target appears, then grabs
/// it, with the occasional wrong grab.
struct DemoPlayer {
    rng: Pcg32,
    /// Seconds each object has been visible
    seen: HashMap<ObjectId, f64>,
    reaction: f64,
    mistake_rate: f64,
}

impl DemoPlayer {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            seen: HashMap::new(),
            reaction: 0.9,
            mistake_rate: 0.15,
        }
    }

    /// Pick an object to grab this frame, if any
    fn choose(&mut self, snap: &Snapshot, dt: f64) -> Option<ObjectId> {
        self.seen.retain(|id, _| snap.object(*id).is_some());
        for obj in &snap.objects {
            *self.seen.entry(obj.id).or_insert(0.0) += dt;
        }

        let target = snap.target()?;
        let ready = |id: &ObjectId| self.seen.get(id).is_some_and(|t| *t >= self.reaction);

        if self.rng.random_bool(self.mistake_rate * dt) {
            return snap
                .objects
                .iter()
                .find(|o| o.kind != target && ready(&o.id))
                .map(|o| o.id);
        }

        snap.objects
            .iter()
            .filter(|o| o.kind == target && ready(&o.id))
            // Lowest object first; it leaves the field soonest
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|o| o.id)
    }
}

/// Host loop state
struct Game {
    session: GameSession,
    player: DemoPlayer,
    jitter: Pcg32,
    frames: u32,
    grabs: HashMap<GrabOutcome, u32>,
}

impl Game {
    fn new(session: GameSession, seed: u64) -> Self {
        Self {
            session,
            player: DemoPlayer::new(seed),
            jitter: Pcg32::seed_from_u64(seed),
            frames: 0,
            grabs: HashMap::new(),
        }
    }

    /// Frame time with a little scheduling noise (and the odd hitch)
    fn next_dt(&mut self) -> f64 {
        let hitch = if self.jitter.random_bool(0.01) { 0.25 } else { 0.0 };
        FRAME_DT * self.jitter.random_range(0.8..1.2) + hitch
    }

    /// Tick the intro until it reports completion
    fn run_intro(&mut self) {
        while self.frames < MAX_FRAMES {
            self.frames += 1;
            let snap = self.session.tick(FRAME_DT);
            if snap.events.contains(&GameEvent::IntroFinished) || snap.intro_remaining <= 0.0 {
                break;
            }
        }
    }

    /// Run play until GameOver
    fn run_play(&mut self) {
        while self.frames < MAX_FRAMES {
            self.frames += 1;
            let dt = self.next_dt();
            let snap = self.session.tick(dt);
            self.report(&snap);

            if snap.phase == GamePhase::GameOver {
                return;
            }

            if let Some(id) = self.player.choose(&snap, dt) {
                let outcome = self.session.submit_grab(id);
                *self.grabs.entry(outcome).or_insert(0) += 1;
            }
        }

        log::warn!("Frame cap reached, ending session");
        self.session.end_session();
    }

    fn report(&self, snap: &Snapshot) {
        let catalog = self.session.catalog();
        for event in &snap.events {
            match event {
                GameEvent::PromptChanged { step, prompt } => {
                    if let Some(p) = catalog.prompt(*prompt) {
                        let target = catalog.kind(p.target).map(|k| k.display_name.as_str());
                        log::info!("Step {}: {:?} -> {}", step, p.cue, target.unwrap_or("?"));
                    }
                }
                GameEvent::Grabbed { id, outcome, .. } => {
                    log::info!("Grab {}: {:?} (score {})", id, outcome, snap.score);
                }
                GameEvent::RoundEndCountdown { step } => {
                    log::info!("Step {} ending soon", step);
                }
                GameEvent::GameEndCountdown => log::info!("Final countdown"),
                GameEvent::GameOver { score } => log::info!("Final score {}", score),
                _ => log::trace!("{:?}", event),
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let mut settings = match &args.config {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(steps) = args.steps {
        settings.total_steps = steps;
    }
    if let Some(secs) = args.step_secs {
        settings.step_duration = secs;
    }
    let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
    settings.seed = Some(seed);

    log::info!("Fruit Grab (headless) starting, seed {}", seed);

    let catalog = Arc::new(Catalog::fruit_grab()?);
    let session = GameSession::new(catalog, settings)?;
    let mut game = Game::new(session, seed);

    game.run_intro();
    game.session.start()?;
    game.run_play();

    log::info!("{} frames, grabs by outcome: {:?}", game.frames, game.grabs);
    if let Some(summary) = game.session.summary() {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
