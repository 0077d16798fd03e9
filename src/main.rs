//! Headless demo run
//!
//! Plays a short scripted session against a recording surface and logs the
//! gameplay events. Usage: `protostriker [easy|normal|hard] [level.json]`

use protostriker::settings::Difficulty;
use protostriker::sim::Level;
use protostriker::surface::DrawList;
use protostriker::{Button, Campaign, ConfigError, Game, InputSnapshot, Settings};

const DEMO_LEVEL: &str = r#"{
    "name": "demo",
    "length": 1200,
    "records": [
        {"type": "enemy_01", "x": 360, "y": 60, "drops_pickup": true},
        {"type": "enemy_01", "x": 380, "y": 60},
        {"type": "enemy_01", "x": 400, "y": 60},
        {"type": "enemy_03", "x": 520, "y": 140},
        {"type": "enemy_05", "x": 640, "y": 100, "drops_pickup": true},
        {"type": "enemy_02", "x": 760, "y": 180},
        {"type": "enemy_08", "x": 900, "y": 120}
    ]
}"#;

/// Frames in the demo (about 40 seconds at 60 fps)
const DEMO_FRAMES: u32 = 2400;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Protostriker (headless) starting...");

    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .map(|s| Difficulty::from_str(&s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty '{s}', using Normal");
            Difficulty::Normal
        }))
        .unwrap_or_default();
    let level_json = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Cannot read level {path}: {e}");
                std::process::exit(1);
            }
        },
        None => DEMO_LEVEL.to_string(),
    };

    if let Err(e) = run(difficulty, &level_json) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

fn run(difficulty: Difficulty, level_json: &str) -> Result<(), ConfigError> {
    let settings = Settings::from_preset(difficulty);
    log::info!("Difficulty: {}", settings.difficulty.as_str());
    let level = Level::from_json(level_json)?;
    let mut game = Game::new(Campaign::standard(settings, vec![level])?)?;

    let mut input = InputSnapshot::new();
    let mut surface = DrawList::default();
    let mut score: u32 = 0;

    for frame in 0..DEMO_FRAMES {
        surface.clear();
        script(frame, &mut input);
        // Uneven frame times to exercise the accumulator
        let elapsed = if frame % 3 == 0 { 0.02 } else { 0.015 };
        game.frame(elapsed, &input, &mut surface)?;
        input.clear_pressed();

        for event in game.drain_events() {
            log::info!("frame {frame}: {event:?}");
        }
        if let Some(text) = surface.texts().find(|t| t.starts_with("SCORE")) {
            score = text.trim_start_matches("SCORE ").parse().unwrap_or(score);
        }
    }

    log::info!(
        "Demo finished after {} ticks, state {:?}, last score {score}",
        game.total_ticks(),
        game.stack()
    );
    Ok(())
}

/// Start the game, then weave up and down with the trigger held
fn script(frame: u32, input: &mut InputSnapshot) {
    if frame == 30 {
        input.press(Button::Start);
        return;
    }
    input.release(Button::Start);

    let weave = (frame / 90) % 2 == 0;
    input.release(Button::Up);
    input.release(Button::Down);
    if frame > 30 {
        input.press(if weave { Button::Up } else { Button::Down });
        input.press(Button::B);
    }
}
