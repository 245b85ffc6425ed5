use crate::game::{Direction, Grid};
use crate::levels::{LevelError, Levels};
use crate::movement::MoveOutcome;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Solved,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    /// Moves and resets are only accepted while playing
    #[display("level {level} is solved; advance to the next level first")]
    NotPlaying { level: usize },
    /// Advancing is only accepted once the level is solved
    #[display("level {level} is not solved yet")]
    NotSolved { level: usize },
    #[display("{_0}")]
    Level(#[error(source)] LevelError),
}

impl From<LevelError> for SessionError {
    fn from(err: LevelError) -> Self {
        SessionError::Level(err)
    }
}

/// Drives play through a table of levels.
///
/// The session owns the only live [`Grid`]. Loading, resetting and advancing
/// replace it with a fresh grid built from the level definition.
#[derive(Debug, Clone)]
pub struct Session {
    levels: Levels,
    index: usize,
    grid: Grid,
    state: SessionState,
}

impl Session {
    pub fn new(levels: Levels) -> Result<Self, SessionError> {
        Self::with_start_level(levels, 0)
    }

    /// Start at the given level (0-indexed, wrapping past the last level).
    pub fn with_start_level(levels: Levels, index: usize) -> Result<Self, SessionError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels.into());
        }
        let index = index % levels.len();
        let grid = Self::load(&levels, index)?;
        Ok(Session {
            levels,
            index,
            grid,
            state: SessionState::Playing,
        })
    }

    fn load(levels: &Levels, index: usize) -> Result<Grid, SessionError> {
        let grid = levels.load(index).ok_or(LevelError::NoLevels)??;
        info!("loaded level {}/{}", index + 1, levels.len());
        Ok(grid)
    }

    pub fn level_index(&self) -> usize {
        self.index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_solved(&self) -> bool {
        self.grid.is_solved()
    }

    /// Apply one move to the current level.
    ///
    /// The win check runs after every accepted command, whatever the outcome,
    /// so a level that loads already solved flips to `Solved` on the first move.
    pub fn handle_move(&mut self, dir: Direction) -> Result<MoveOutcome, SessionError> {
        if self.state.is_solved() {
            return Err(SessionError::NotPlaying { level: self.index });
        }

        let outcome = self.grid.attempt_move(dir);
        if self.grid.is_solved() {
            info!("level {} solved", self.index + 1);
            self.state = SessionState::Solved;
        }
        Ok(outcome)
    }

    /// Throw away all progress on the current level.
    pub fn reset_current_level(&mut self) -> Result<(), SessionError> {
        if self.state.is_solved() {
            return Err(SessionError::NotPlaying { level: self.index });
        }

        self.grid = Self::load(&self.levels, self.index)?;
        info!("level {} reset", self.index + 1);
        Ok(())
    }

    /// Move on from a solved level, wrapping back to the first level after
    /// the last one.
    pub fn advance_to_next_level(&mut self) -> Result<(), SessionError> {
        if self.state.is_playing() {
            return Err(SessionError::NotSolved { level: self.index });
        }

        let next = (self.index + 1) % self.levels.len();
        self.grid = Self::load(&self.levels, next)?;
        self.index = next;
        self.state = SessionState::Playing;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use proptest::prelude::*;

    fn moves(script: &str) -> Vec<Direction> {
        script
            .chars()
            .map(|ch| Direction::from_lurd(ch).unwrap())
            .collect()
    }

    fn levels(defs: &[&[&str]]) -> Levels {
        Levels::new(
            defs.iter()
                .map(|rows| rows.iter().map(|row| row.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new(Levels::builtin()).unwrap();
        assert_eq!(session.level_index(), 0);
        assert_eq!(session.level_count(), 2);
        assert_eq!(session.state(), SessionState::Playing);
        assert!(!session.is_solved());
        assert_eq!(session.grid(), &Levels::builtin().load(0).unwrap().unwrap());
    }

    #[test]
    fn test_solve_first_level() {
        let mut session = Session::new(Levels::builtin()).unwrap();

        let script = moves("RRLLDRURD");
        let (last, rest) = script.split_last().unwrap();
        for &dir in rest {
            session.handle_move(dir).unwrap();
            assert_eq!(session.state(), SessionState::Playing);
            assert!(!session.is_solved());
        }

        assert_eq!(session.handle_move(*last).unwrap(), MoveOutcome::PushedBox);
        assert_eq!(session.state(), SessionState::Solved);
        assert!(session.is_solved());
    }

    #[test]
    fn test_blocked_move_leaves_grid_unchanged() {
        let mut session = Session::new(Levels::builtin()).unwrap();
        let before = session.grid().clone();
        assert_eq!(
            session.handle_move(Direction::Left).unwrap(),
            MoveOutcome::Blocked
        );
        assert_eq!(session.grid(), &before);
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn test_reset_restores_origin() {
        let mut session = Session::new(Levels::builtin()).unwrap();
        for dir in moves("RRLLD") {
            session.handle_move(dir).unwrap();
        }
        assert_ne!(session.grid().player(), Position::new(1, 1));

        session.reset_current_level().unwrap();
        assert_eq!(session.grid(), &Levels::builtin().load(0).unwrap().unwrap());
        assert!(!session.is_solved());
        assert_eq!(session.level_index(), 0);
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn test_advance_and_wrap() {
        let mut session = Session::new(Levels::builtin()).unwrap();
        for dir in moves("RRLLDRURD") {
            session.handle_move(dir).unwrap();
        }
        session.advance_to_next_level().unwrap();
        assert_eq!(session.level_index(), 1);
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.grid(), &Levels::builtin().load(1).unwrap().unwrap());

        for dir in moves("RDURD") {
            session.handle_move(dir).unwrap();
        }
        assert_eq!(session.state(), SessionState::Solved);

        session.advance_to_next_level().unwrap();
        assert_eq!(session.level_index(), 0);
        assert_eq!(session.grid(), &Levels::builtin().load(0).unwrap().unwrap());
    }

    #[test]
    fn test_single_level_wraps_to_itself() {
        let mut session = Session::new(levels(&[&["#####", "#@$.#", "#####"]])).unwrap();
        session.handle_move(Direction::Right).unwrap();
        assert!(session.state().is_solved());

        session.advance_to_next_level().unwrap();
        assert_eq!(session.level_index(), 0);
        assert!(!session.is_solved());
    }

    #[test]
    fn test_undefined_transitions_are_rejected() {
        let mut session = Session::new(levels(&[&["#####", "#@$.#", "#####"]])).unwrap();
        assert!(matches!(
            session.advance_to_next_level(),
            Err(SessionError::NotSolved { level: 0 })
        ));

        session.handle_move(Direction::Right).unwrap();
        let solved = session.grid().clone();

        assert!(matches!(
            session.handle_move(Direction::Left),
            Err(SessionError::NotPlaying { level: 0 })
        ));
        assert!(matches!(
            session.reset_current_level(),
            Err(SessionError::NotPlaying { level: 0 })
        ));
        assert_eq!(session.grid(), &solved);
        assert_eq!(session.state(), SessionState::Solved);
    }

    #[test]
    fn test_level_solved_at_load() {
        let mut session = Session::new(levels(&[&["####", "#@ #", "####"]])).unwrap();
        assert!(session.is_solved());
        assert_eq!(session.state(), SessionState::Playing);

        assert_eq!(
            session.handle_move(Direction::Left).unwrap(),
            MoveOutcome::Blocked
        );
        assert_eq!(session.state(), SessionState::Solved);
    }

    #[test]
    fn test_with_start_level() {
        let session = Session::with_start_level(Levels::builtin(), 1).unwrap();
        assert_eq!(session.level_index(), 1);

        let session = Session::with_start_level(Levels::builtin(), 5).unwrap();
        assert_eq!(session.level_index(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = SessionError::from(LevelError::MalformedLevel { players: 0 });
        assert_eq!(
            err.to_string(),
            "malformed level: expected exactly one player, found 0"
        );
        assert_eq!(
            SessionError::NotSolved { level: 3 }.to_string(),
            "level 3 is not solved yet"
        );
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn test_reset_after_any_moves(script in prop::collection::vec(direction(), 0..48)) {
            let mut session = Session::with_start_level(Levels::builtin(), 1).unwrap();
            for dir in script {
                if session.state().is_solved() {
                    break;
                }
                session.handle_move(dir).unwrap();
            }

            if session.state().is_playing() {
                session.reset_current_level().unwrap();
                prop_assert_eq!(session.grid(), &Levels::builtin().load(1).unwrap().unwrap());
                prop_assert!(!session.is_solved());
            } else {
                session.advance_to_next_level().unwrap();
                prop_assert_eq!(session.level_index(), 0);
            }
        }
    }
}
