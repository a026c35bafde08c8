//! Forest Brawl entry point
//!
//! Native builds run a headless autopilot session and log how it went. The
//! browser build is driven from JS through `forest_brawl::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use forest_brawl::Tuning;
    use forest_brawl::consts::{SIM_DT, TICKS_PER_SECOND};
    use forest_brawl::sim::{Command, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Forest Brawl (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Bad seed argument ({}), using 42", e);
            42
        }
        None => 42,
    };
    let seconds = match args.next().map(|s| s.parse::<u32>()) {
        Some(Ok(secs)) => secs,
        Some(Err(e)) => {
            log::warn!("Bad duration argument ({}), using 60", e);
            60
        }
        None => 60,
    };

    let tuning = Tuning::load();
    let mut state = GameState::new(seed, tuning);
    log::info!("Game initialized with seed: {}", seed);

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let total_ticks = seconds as u64 * TICKS_PER_SECOND as u64;
    for _ in 0..total_ticks {
        tick(&mut state, &input, SIM_DT);

        for command in &state.last_commands {
            match command {
                Command::RepositionPlayer => {
                    log::info!(
                        "[{:>6.2}s] Knocked back, power now {}",
                        state.elapsed_secs(),
                        state.player().power_level
                    );
                }
                Command::RemoveEnemy { enemy } => {
                    log::info!(
                        "[{:>6.2}s] Defeated enemy {}, score {}",
                        state.elapsed_secs(),
                        enemy,
                        state.player().score
                    );
                }
                Command::RemovePowerUp { .. } => {
                    log::info!(
                        "[{:>6.2}s] Treasure! power {}, score {}",
                        state.elapsed_secs(),
                        state.player().power_level,
                        state.player().score
                    );
                }
                _ => {}
            }
        }
    }

    let player = state.player();
    let stats = state.stats;
    println!("Seed {} after {}s:", seed, seconds);
    println!("  Score:        {}", player.score);
    println!("  Player Power: {} (peak {})", player.power_level, stats.peak_power);
    println!(
        "  Encounters:   {} won, {} lost, {} tied",
        stats.wins, stats.losses, stats.ties
    );
    println!(
        "  Spawned:      {} enemies, {} power-ups ({} collected)",
        stats.enemies_spawned, stats.power_ups_spawned, stats.power_ups_collected
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is forest_brawl::web::start, this is just to satisfy the compiler
}
