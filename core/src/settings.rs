use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::RangeInclusive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

/// Accepted board side lengths.
pub const SIDE_RANGE: RangeInclusive<u32> = 5..=Coord::MAX as u32;

/// Accepted mine ratios, in percent.
pub const MINE_RATIO_RANGE: RangeInclusive<u32> = 5..=40;

/// Validated board configuration.
///
/// Can only be obtained through [`GameConfig::new`] or [`SettingsForm::validate`], so every value
/// reaching the board is in range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    rows: Coord,
    cols: Coord,
    mine_ratio: u8,
}

impl GameConfig {
    pub fn new(rows: u32, cols: u32, mine_ratio: u32) -> core::result::Result<Self, ValidationError> {
        let mut issues = Vec::new();
        check_range(&mut issues, ConfigField::Rows, rows, SIDE_RANGE);
        check_range(&mut issues, ConfigField::Cols, cols, SIDE_RANGE);
        check_range(
            &mut issues,
            ConfigField::MineRatio,
            mine_ratio,
            MINE_RATIO_RANGE,
        );

        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        // all three were range checked against bounds that fit in u8
        Ok(Self {
            rows: rows as Coord,
            cols: cols as Coord,
            mine_ratio: mine_ratio as u8,
        })
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn mine_ratio(&self) -> u8 {
        self.mine_ratio
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn total_mines(&self) -> CellCount {
        total_mines(self.rows as u32, self.cols as u32, self.mine_ratio as u32)
    }

    pub const fn difficulty(&self) -> Difficulty {
        Difficulty::from_ratio(self.mine_ratio as u32)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 10,
            mine_ratio: 15,
        }
    }
}

const fn total_mines(rows: u32, cols: u32, mine_ratio: u32) -> CellCount {
    (rows * cols * mine_ratio / 100) as CellCount
}

fn check_range(
    issues: &mut Vec<FieldIssue>,
    field: ConfigField,
    value: u32,
    range: RangeInclusive<u32>,
) {
    if !range.contains(&value) {
        issues.push(FieldIssue {
            field,
            problem: out_of_range(field, value as f64),
        });
    }
}

const fn field_range(field: ConfigField) -> RangeInclusive<u32> {
    match field {
        ConfigField::Rows | ConfigField::Cols => SIDE_RANGE,
        ConfigField::MineRatio => MINE_RATIO_RANGE,
    }
}

/// Picks the message matching what the settings panel shows for each field.
fn out_of_range(field: ConfigField, value: f64) -> FieldProblem {
    match field {
        ConfigField::Rows | ConfigField::Cols if value < f64::from(*SIDE_RANGE.start()) => {
            FieldProblem::TooSmall {
                min: *SIDE_RANGE.start(),
            }
        }
        ConfigField::Rows | ConfigField::Cols => FieldProblem::TooLarge {
            max: *SIDE_RANGE.end(),
        },
        ConfigField::MineRatio => FieldProblem::OutOfRange {
            min: *MINE_RATIO_RANGE.start(),
            max: *MINE_RATIO_RANGE.end(),
        },
    }
}

/// Label shown next to the mine count, only depends on the ratio.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Casual,
    Easy,
    Medium,
    Hard,
    Expert,
    Insane,
}

impl Difficulty {
    pub const fn from_ratio(mine_ratio: u32) -> Self {
        use Difficulty::*;
        match mine_ratio {
            0..10 => Casual,
            10..15 => Easy,
            15..20 => Medium,
            20..25 => Hard,
            25..30 => Expert,
            _ => Insane,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Difficulty::*;
        f.write_str(match self {
            Casual => "Casual",
            Easy => "Easy",
            Medium => "Medium",
            Hard => "Hard",
            Expert => "Expert",
            Insane => "Insane",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigField {
    Rows,
    Cols,
    MineRatio,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rows => "rows",
            Self::Cols => "columns",
            Self::MineRatio => "mine ratio",
        })
    }
}

#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldProblem {
    #[error("must be greater than or equal to {min}")]
    TooSmall { min: u32 },
    #[error("must be less than or equal to {max}")]
    TooLarge { max: u32 },
    #[error("must be between {min} and {max}")]
    OutOfRange { min: u32, max: u32 },
    #[error("must be an integer")]
    NotAnInteger,
}

#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[error("{field} {problem}")]
pub struct FieldIssue {
    pub field: ConfigField,
    pub problem: FieldProblem,
}

/// Every field that failed validation, in form order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn fields(&self) -> impl Iterator<Item = ConfigField> + '_ {
        self.issues.iter().map(|issue| issue.field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl core::error::Error for ValidationError {}

/// Raw contents of the settings panel, as typed by the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub rows: String,
    pub cols: String,
    pub mine_ratio: String,
}

impl SettingsForm {
    pub fn new(rows: impl Into<String>, cols: impl Into<String>, mine_ratio: impl Into<String>) -> Self {
        Self {
            rows: rows.into(),
            cols: cols.into(),
            mine_ratio: mine_ratio.into(),
        }
    }

    /// Form pre-filled with an existing configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        use alloc::string::ToString;
        Self {
            rows: config.rows.to_string(),
            cols: config.cols.to_string(),
            mine_ratio: config.mine_ratio.to_string(),
        }
    }

    pub fn validate(&self) -> core::result::Result<GameConfig, ValidationError> {
        let fields = [
            (ConfigField::Rows, &self.rows),
            (ConfigField::Cols, &self.cols),
            (ConfigField::MineRatio, &self.mine_ratio),
        ];

        let mut issues = Vec::new();
        let mut values = [0u32; 3];
        for (slot, (field, text)) in values.iter_mut().zip(fields) {
            match parse_field(field, text) {
                Ok(value) => {
                    check_range(&mut issues, field, value, field_range(field));
                    *slot = value;
                }
                Err(problem) => issues.push(FieldIssue { field, problem }),
            }
        }

        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        let [rows, cols, mine_ratio] = values;
        GameConfig::new(rows, cols, mine_ratio)
    }

    /// Mine count the form would produce, as long as all fields parse as numbers.
    pub fn preview_total_mines(&self) -> Option<u32> {
        let rows = parse_number(&self.rows)?;
        let cols = parse_number(&self.cols)?;
        let mine_ratio = parse_number(&self.mine_ratio)?;
        let mines = rows * cols * mine_ratio / 100.0;
        // truncating cast floors non-negative values
        (0.0..=f64::from(u32::MAX))
            .contains(&mines)
            .then_some(mines as u32)
    }

    pub fn preview_difficulty(&self) -> Option<Difficulty> {
        let mine_ratio = parse_number(&self.mine_ratio)?;
        Some(if mine_ratio < 0.0 {
            Difficulty::Casual
        } else {
            Difficulty::from_ratio(mine_ratio.min(f64::from(u32::MAX)) as u32)
        })
    }
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

fn is_whole(value: f64) -> bool {
    value == (value as i64) as f64
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Range problems win over integer problems, `4.5` rows is reported as too small.
fn parse_field(field: ConfigField, text: &str) -> core::result::Result<u32, FieldProblem> {
    match parse_number(text) {
        Some(value) if is_whole(value) && (0.0..=f64::from(u32::MAX)).contains(&value) => {
            Ok(value as u32)
        }
        Some(value) => {
            let range = field_range(field);
            if value < f64::from(*range.start()) || value > f64::from(*range.end()) {
                Err(out_of_range(field, value))
            } else {
                Err(FieldProblem::NotAnInteger)
            }
        }
        None => Err(FieldProblem::NotAnInteger),
    }
}
