use crate::levels::LevelError;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// The neighbouring cell one step in the given direction.
    pub fn step(self, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Parse a move letter in LURD notation. Upper case (a push in solution
    /// files) and lower case both map to the same direction.
    pub fn from_lurd(ch: char) -> Option<Direction> {
        match ch.to_ascii_lowercase() {
            'u' => Some(Direction::Up),
            'd' => Some(Direction::Down),
            'l' => Some(Direction::Left),
            'r' => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

/// Puzzle state for one level instance.
///
/// Walls and targets are fixed once the grid is loaded. Boxes and the player
/// change only through [`Grid::attempt_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub(crate) walls: BTreeSet<Position>,
    pub(crate) targets: BTreeSet<Position>,
    pub(crate) boxes: BTreeSet<Position>,
    pub(crate) player: Position,
}

impl Grid {
    /// Build a grid from a level definition, one string per row.
    ///
    /// Characters:
    /// - `#` = Wall
    /// - `$` = Box
    /// - `.` = Target
    /// - `@` = Player
    /// - anything else = Floor
    ///
    /// Rows may have different lengths. Exactly one `@` must appear.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        let mut walls = BTreeSet::new();
        let mut targets = BTreeSet::new();
        let mut boxes = BTreeSet::new();
        let mut players = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.as_ref().chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                match ch {
                    '#' => {
                        walls.insert(pos);
                    }
                    '$' => {
                        boxes.insert(pos);
                    }
                    '.' => {
                        targets.insert(pos);
                    }
                    '@' => players.push(pos),
                    _ => {}
                }
            }
        }

        let player = match players.as_slice() {
            [player] => *player,
            _ => {
                return Err(LevelError::MalformedLevel {
                    players: players.len(),
                });
            }
        };

        Ok(Grid {
            walls,
            targets,
            boxes,
            player,
        })
    }

    /// Same as [`Grid::from_rows`], taking the rows as newline-separated text.
    pub fn from_text(text: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text.lines().collect();
        Self::from_rows(&rows)
    }

    pub fn walls(&self) -> &BTreeSet<Position> {
        &self.walls
    }

    pub fn targets(&self) -> &BTreeSet<Position> {
        &self.targets
    }

    pub fn boxes(&self) -> &BTreeSet<Position> {
        &self.boxes
    }

    pub fn player(&self) -> Position {
        self.player
    }

    /// Check if all boxes are on targets (win condition).
    ///
    /// Uncovered targets don't matter, and a level without boxes counts as
    /// solved.
    pub fn is_solved(&self) -> bool {
        self.boxes.is_subset(&self.targets)
    }

    fn bounds(&self) -> (Position, Position) {
        let mut min = Position::new(0, 0);
        let mut max = self.player;
        for pos in self
            .walls
            .iter()
            .chain(&self.targets)
            .chain(&self.boxes)
            .chain(std::iter::once(&self.player))
        {
            min = Position::new(min.x.min(pos.x), min.y.min(pos.y));
            max = Position::new(max.x.max(pos.x), max.y.max(pos.y));
        }
        (min, max)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = self.bounds();
        for y in min.y..=max.y {
            let mut line = String::new();
            for x in min.x..=max.x {
                let pos = Position::new(x, y);
                let on_target = self.targets.contains(&pos);

                let ch = if pos == self.player {
                    if on_target { '+' } else { '@' }
                } else if self.boxes.contains(&pos) {
                    if on_target { '*' } else { '$' }
                } else if self.walls.contains(&pos) {
                    '#'
                } else if on_target {
                    '.'
                } else {
                    ' '
                };
                line.push(ch);
            }
            // Trim trailing spaces to match original input format
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
