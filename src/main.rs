//! Pucket headless runner
//!
//! Plays an automated match at full speed and prints the final snapshot as
//! JSON. There's no pointer in headless mode, so both seats are automated.
//!
//! Usage: `pucket [settings.json]`

use std::path::Path;

use pucket::Settings;
use pucket::sim::{GameEvent, MatchState, Role, Snapshot, TickInput, run_frame};

fn main() {
    env_logger::init();
    log::info!("Pucket (headless) starting...");

    let mut settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    if settings.roles.contains(&Role::Human) {
        log::info!("No pointer input in headless mode; seating automated actors");
        settings.roles = [Role::Automated, Role::Automated];
    }

    let mut state = MatchState::new(&settings);
    let input = TickInput::default();

    while !state.game_over && state.time_ticks < settings.max_ticks {
        for event in run_frame(&mut state, &input) {
            match event {
                GameEvent::PieceSunk { player, piece } => {
                    log::info!("{} sank {:?}", state.players[player.0].name, piece);
                }
                GameEvent::MatchReset => log::warn!("Match was reset"),
                _ => {}
            }
        }
    }

    let played = state.tuning.tick_duration().mul_f64(state.time_ticks as f64);
    log::info!("Played {} ticks (~{:.1}s of real time)", state.time_ticks, played.as_secs_f64());
    if !state.game_over {
        log::warn!("Stopped after {} ticks without a winner", state.time_ticks);
    }
    log::info!(
        "Final score: {} {} - {} {}",
        state.players[0].name,
        state.players[0].score,
        state.players[1].score,
        state.players[1].name
    );

    match Snapshot::capture(&state).to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}
