use std::path::PathBuf;

use clap::Parser;

use crate::error::GameError;
use crate::grid::Grid;
use crate::input::Speed;

pub const SCREEN_WIDTH: u32 = 640;
pub const SCREEN_HEIGHT: u32 = 480;
pub const GRID_SIZE: u32 = 20;

pub const INITIAL_SPEED: u32 = 10;
pub const MIN_SPEED: u32 = 5;
pub const MAX_SPEED: u32 = 20;

#[derive(Parser, Debug, Clone)]
#[command(name = "snake", version, about = "Snake on a wrap-around board")]
pub struct Args {
    /// Board width in pixels; must be a multiple of the cell size.
    #[arg(long, env = "SNAKE_WIDTH", default_value_t = SCREEN_WIDTH)]
    pub width: u32,

    /// Board height in pixels; must be a multiple of the cell size.
    #[arg(long, env = "SNAKE_HEIGHT", default_value_t = SCREEN_HEIGHT)]
    pub height: u32,

    /// Side of one square cell in pixels.
    #[arg(long, env = "SNAKE_CELL_SIZE", default_value_t = GRID_SIZE)]
    pub cell_size: u32,

    /// Starting speed in ticks per second.
    #[arg(long, env = "SNAKE_SPEED", default_value_t = INITIAL_SPEED)]
    pub speed: u32,

    #[arg(long, env = "SNAKE_MIN_SPEED", default_value_t = MIN_SPEED)]
    pub min_speed: u32,

    #[arg(long, env = "SNAKE_MAX_SPEED", default_value_t = MAX_SPEED)]
    pub max_speed: u32,

    /// Fixed RNG seed for reproducible food and start directions.
    #[arg(long, env = "SNAKE_SEED")]
    pub seed: Option<u64>,

    /// Write tracing output to this file. Nothing is logged otherwise.
    #[arg(long, env = "SNAKE_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub grid: Grid,
    pub speed: Speed,
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn from_args(args: &Args) -> Result<Self, GameError> {
        let grid = Grid::from_pixels(args.width, args.height, args.cell_size)?;

        let invalid = |reason| GameError::InvalidSpeed {
            initial: args.speed,
            min: args.min_speed,
            max: args.max_speed,
            reason,
        };
        if args.min_speed == 0 {
            return Err(invalid("minimum speed must be positive"));
        }
        if args.min_speed > args.max_speed {
            return Err(invalid("minimum speed exceeds maximum speed"));
        }
        if !(args.min_speed..=args.max_speed).contains(&args.speed) {
            return Err(invalid("initial speed is out of range"));
        }

        Ok(GameConfig {
            grid,
            speed: Speed::new(args.speed, args.min_speed, args.max_speed),
            seed: args.seed,
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid: Grid::new((SCREEN_WIDTH / GRID_SIZE) as u16, (SCREEN_HEIGHT / GRID_SIZE) as u16),
            speed: Speed::new(INITIAL_SPEED, MIN_SPEED, MAX_SPEED),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["snake"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_the_classic_board() {
        let config = GameConfig::from_args(&parse(&[])).unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!((config.grid.cols(), config.grid.rows()), (32, 24));
        assert_eq!(config.speed.get(), 10);
    }

    #[test]
    fn custom_board_and_seed() {
        let args = parse(&["--width", "200", "--height", "100", "--cell-size", "10", "--seed", "42"]);
        let config = GameConfig::from_args(&args).unwrap();
        assert_eq!((config.grid.cols(), config.grid.rows()), (20, 10));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn rejects_bad_speeds() {
        for extra in [
            &["--min-speed", "0"][..],
            &["--min-speed", "12", "--max-speed", "8"][..],
            &["--speed", "30"][..],
        ] {
            let err = GameConfig::from_args(&parse(extra)).unwrap_err();
            assert!(matches!(err, GameError::InvalidSpeed { .. }), "{:?}", extra);
        }
    }

    #[test]
    fn rejects_uneven_board() {
        let err = GameConfig::from_args(&parse(&["--width", "645"])).unwrap_err();
        assert!(matches!(err, GameError::InvalidBoard { .. }));
    }
}
