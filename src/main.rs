//! Headless session runner
//!
//! Plays a session with a simple autopilot and prints a summary. Useful for
//! balance checks and for replaying a seed.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    let cli = native::Cli::parse();
    let roster = native::load_roster(cli.config.as_deref())?;
    native::run(&cli, roster);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the host page on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use clap::{Parser, ValueEnum};

    use broadside::consts::FRAME_MS;
    use broadside::sim::{AbilityState, GameEvent, GameState, TickInput, tick, turn_to_fire};
    use broadside::{PlayerClass, Roster, wrap_angle};

    #[derive(Parser, Debug)]
    #[command(name = "broadside")]
    #[command(about = "Run a headless ship-combat session under autopilot")]
    pub struct Cli {
        /// Session seed
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// Hull the autopilot sails
        #[arg(long, value_enum, default_value_t = CliClass::Brig)]
        pub class: CliClass,
        /// Session length cap in seconds
        #[arg(long, default_value_t = 120.0)]
        pub seconds: f64,
        /// Roster overrides (JSON)
        #[arg(long)]
        pub config: Option<PathBuf>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
    pub enum CliClass {
        Brig,
        Frigate,
        #[value(alias = "mow")]
        ManOfWar,
    }

    impl From<CliClass> for PlayerClass {
        fn from(value: CliClass) -> Self {
            match value {
                CliClass::Brig => PlayerClass::Brig,
                CliClass::Frigate => PlayerClass::Frigate,
                CliClass::ManOfWar => PlayerClass::ManOfWar,
            }
        }
    }

    pub fn load_roster(path: Option<&Path>) -> Result<Roster> {
        let Some(path) = path else {
            return Ok(Roster::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let roster = Roster::from_json_str(&json)
            .with_context(|| format!("invalid roster {}", path.display()))?;
        log::info!("loaded roster from {}", path.display());
        Ok(roster)
    }

    /// Steer broadside-on to the nearest enemy, keep the guns going, and
    /// pop the ability whenever it is ready.
    fn autopilot(state: &GameState) -> TickInput {
        let player = &state.player;
        let nearest = state.enemies.iter().min_by(|a, b| {
            let da = a.position().distance_squared(player.position());
            let db = b.position().distance_squared(player.position());
            da.total_cmp(&db)
        });

        let mut input = TickInput {
            fire: true,
            activate_ability: player.ability_state() == Some(AbilityState::Charged),
            ..Default::default()
        };

        match nearest {
            Some(enemy) => {
                let aim = turn_to_fire(
                    player.position(),
                    enemy.position(),
                    player.body.angle,
                    std::f32::consts::TAU,
                );
                let delta = wrap_angle(aim - player.body.angle);
                input.turn_left = delta < -player.body.turn_speed / 2.0;
                input.turn_right = delta > player.body.turn_speed / 2.0;
                input.thrust = player.position().distance(enemy.position()) > 300.0;
            }
            None => {
                // Drift toward the nearest pickup if any
                if let Some(pickup) = state.pickups.first() {
                    let bearing = (pickup.body.position - player.position()).to_angle();
                    let delta = wrap_angle(bearing - player.body.angle);
                    input.turn_left = delta < 0.0;
                    input.turn_right = delta > 0.0;
                    input.thrust = true;
                }
            }
        }
        input
    }

    pub fn run(cli: &Cli, roster: Roster) {
        let class = PlayerClass::from(cli.class);
        let mut state = GameState::new(cli.seed, roster, class);
        let mut kills = 0u32;
        let mut bosses = 0u32;
        let mut pickups = 0u32;

        let ticks = (cli.seconds.max(0.0) * 1000.0 / FRAME_MS).ceil() as u64;
        for _ in 0..ticks {
            let input = autopilot(&state);
            tick(&mut state, &input, FRAME_MS);
            for event in &state.events {
                match event {
                    GameEvent::EnemyKilled { .. } => kills += 1,
                    GameEvent::BossDefeated => bosses += 1,
                    GameEvent::PickupCollected { .. } => pickups += 1,
                    _ => {}
                }
            }
            if state.is_game_over() {
                break;
            }
        }

        println!("class:       {}", class.as_str());
        println!("seed:        {}", cli.seed);
        println!("survived:    {:.1}s", state.time_ms / 1000.0);
        println!("score:       {} (x{})", state.score, state.score_multiplier);
        println!("kills:       {kills}");
        println!("bosses sunk: {bosses}");
        println!("pickups:     {pickups}");
        println!("game over:   {}", state.is_game_over());
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_definition() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_cli_defaults() {
            let cli = Cli::try_parse_from(["broadside"]).unwrap();
            assert_eq!(cli.seed, 1);
            assert_eq!(cli.class, CliClass::Brig);
            assert_eq!(cli.seconds, 120.0);
            assert!(cli.config.is_none());
        }

        #[test]
        fn test_cli_flags() {
            let cli = Cli::try_parse_from([
                "broadside", "--seed", "3", "--seconds", "5", "--class", "mow",
            ])
            .unwrap();
            assert_eq!(cli.seed, 3);
            assert_eq!(PlayerClass::from(cli.class), PlayerClass::ManOfWar);
            assert_eq!(cli.seconds, 5.0);

            let cli = Cli::try_parse_from(["broadside", "--class", "man-of-war"]).unwrap();
            assert_eq!(cli.class, CliClass::ManOfWar);
        }

        #[test]
        fn test_cli_help_and_bad_class() {
            let err = Cli::try_parse_from(["broadside", "--help"]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

            let err = Cli::try_parse_from(["broadside", "--class", "sloop"]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
        }

        #[test]
        fn test_missing_roster_file_reports_path() {
            let err = load_roster(Some(Path::new("/nonexistent/roster.json"))).unwrap_err();
            assert!(err.to_string().contains("/nonexistent/roster.json"));
            assert!(load_roster(None).is_ok());
        }
    }
}
