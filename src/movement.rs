use crate::game::{Direction, Grid};
use log::debug;

/// Result of a single move request. `Blocked` is a normal outcome, not an
/// error: the grid is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum MoveOutcome {
    Moved,
    PushedBox,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    #[display("invalid direction ({dx}, {dy}): expected a unit vector")]
    InvalidDirection { dx: i32, dy: i32 },
}

impl Direction {
    /// Map a raw movement vector onto one of the four directions.
    pub fn from_delta(dx: i32, dy: i32) -> Result<Direction, MoveError> {
        match (dx, dy) {
            (0, -1) => Ok(Direction::Up),
            (0, 1) => Ok(Direction::Down),
            (-1, 0) => Ok(Direction::Left),
            (1, 0) => Ok(Direction::Right),
            _ => Err(MoveError::InvalidDirection { dx, dy }),
        }
    }
}

impl Grid {
    /// Move the player one cell, pushing at most one box.
    ///
    /// Either the player and the pushed box both move, or nothing changes.
    pub fn attempt_move(&mut self, dir: Direction) -> MoveOutcome {
        let next = self.player.step(dir);
        if self.walls.contains(&next) {
            debug!("move {} from {} blocked by wall", dir, self.player);
            return MoveOutcome::Blocked;
        }

        if !self.boxes.contains(&next) {
            self.player = next;
            debug!("moved {} to {}", dir, next);
            return MoveOutcome::Moved;
        }

        let beyond = next.step(dir);
        if self.walls.contains(&beyond) || self.boxes.contains(&beyond) {
            debug!("push {} of box at {} blocked at {}", dir, next, beyond);
            return MoveOutcome::Blocked;
        }

        self.boxes.remove(&next);
        self.boxes.insert(beyond);
        self.player = next;
        debug!("pushed box {} from {} to {}", dir, next, beyond);
        MoveOutcome::PushedBox
    }

    /// Like [`Grid::attempt_move`], for a raw `(dx, dy)` vector.
    ///
    /// Anything other than a single orthogonal step is rejected before the
    /// grid is touched.
    pub fn attempt_step(&mut self, dx: i32, dy: i32) -> Result<MoveOutcome, MoveError> {
        let dir = Direction::from_delta(dx, dy)?;
        Ok(self.attempt_move(dir))
    }
}
