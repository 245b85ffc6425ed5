use crate::game::Grid;
use log::info;
use std::fs;
use std::io;

/// Error type for level parsing operations.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LevelError {
    /// IO error when reading from file
    #[display("IO error: {_0}")]
    Io(#[error(source)] io::Error),
    /// A level without exactly one player
    #[display("malformed level: expected exactly one player, found {players}")]
    MalformedLevel { players: usize },
    /// A level table must hold at least one level
    #[display("no levels found")]
    NoLevels,
}

impl From<io::Error> for LevelError {
    fn from(err: io::Error) -> Self {
        LevelError::Io(err)
    }
}

const BUILTIN_LEVELS: [&[&str]; 2] = [
    &["#####", "#@ $.#", "# $  #", "#  . #", "#####"],
    &["#####", "#@  #", "# $$ #", "# .. #", "#####"],
];

/// An ordered, non-empty table of level definitions.
///
/// Definitions are kept as row strings so a level can be reloaded from its
/// original layout at any time. Each one is checked when the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Levels {
    levels: Vec<Vec<String>>,
}

impl Levels {
    pub fn new(levels: Vec<Vec<String>>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }
        for rows in &levels {
            Grid::from_rows(rows.as_slice())?;
        }
        Ok(Levels { levels })
    }

    /// The two stock levels the game ships with.
    pub fn builtin() -> Self {
        let levels = BUILTIN_LEVELS
            .iter()
            .map(|rows| rows.iter().map(|row| row.to_string()).collect())
            .collect();
        Levels { levels }
    }

    /// Parse XSB-style levels from a string.
    ///
    /// - Lines starting with `;` are comments and end the current level
    /// - Empty lines between levels end the current level
    /// - Everything else is a row of the current level
    pub fn from_text(contents: &str) -> Result<Self, LevelError> {
        let mut levels = Vec::new();
        let mut current_level: Vec<String> = Vec::new();

        for line in contents.lines() {
            if line.trim_start().starts_with(';') || line.trim().is_empty() {
                if !current_level.is_empty() {
                    levels.push(std::mem::take(&mut current_level));
                }
                continue;
            }
            current_level.push(line.trim_end().to_string());
        }

        // Don't forget the last level if file doesn't end with empty line
        if !current_level.is_empty() {
            levels.push(current_level);
        }

        Self::new(levels)
    }

    /// Parse XSB-style levels from a text file.
    pub fn from_file(path: &str) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        let levels = Self::from_text(&contents)?;
        info!("loaded {} levels from {}", levels.len(), path);
        Ok(levels)
    }

    /// Get the nth level definition (0-indexed).
    pub fn get(&self, index: usize) -> Option<&[String]> {
        self.levels.get(index).map(Vec::as_slice)
    }

    /// Build a fresh grid for the nth level (0-indexed).
    pub fn load(&self, index: usize) -> Option<Result<Grid, LevelError>> {
        self.get(index).map(Grid::from_rows)
    }

    /// Get the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false: an empty table is rejected on construction.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
