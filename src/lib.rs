//! Push-puzzle (Sokoban) engine: level loading, move resolution, win
//! detection and level sequencing over a discrete grid.

pub mod game;
pub mod levels;
pub mod movement;
pub mod session;

pub use game::{ALL_DIRECTIONS, Direction, Grid, Position};
pub use levels::{LevelError, Levels};
pub use movement::{MoveError, MoveOutcome};
pub use session::{Session, SessionError, SessionState};
