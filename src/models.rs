use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Small,
    Medium,
    Large,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Small, Difficulty::Medium, Difficulty::Large];

    /// Progress weight contributed by a goal of this difficulty.
    pub fn weight(self) -> u32 {
        match self {
            Difficulty::Small => 1,
            Difficulty::Medium => 3,
            Difficulty::Large => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Small => "small",
            Difficulty::Medium => "medium",
            Difficulty::Large => "large",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Small => "Small",
            Difficulty::Medium => "Medium",
            Difficulty::Large => "Large",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown difficulty '{}'", self.0)
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "small" => Ok(Difficulty::Small),
            "medium" => Ok(Difficulty::Medium),
            "large" => Ok(Difficulty::Large),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Goal {
    pub id: i64,
    pub client_id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub weight: u32,
    pub is_done: bool,
    pub date: NaiveDate,
    pub created_at: DateTime<Local>,
}

/// A validated goal that has not been stored yet. Weight is not part of it:
/// the store always derives it from the difficulty.
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub client_id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    EmptyTitle,
    TitleTooLong,
    InvalidDifficulty,
}

impl FormError {
    pub fn message(&self) -> &'static str {
        match self {
            FormError::EmptyTitle => "Please enter a goal.",
            FormError::TitleTooLong => "Goal title must be at most 255 characters.",
            FormError::InvalidDifficulty => "Please choose a difficulty.",
        }
    }
}

impl GoalForm {
    pub fn validate(&self, client_id: &str, date: NaiveDate) -> Result<NewGoal, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(FormError::TitleTooLong);
        }
        let difficulty = self
            .difficulty
            .parse::<Difficulty>()
            .map_err(|_| FormError::InvalidDifficulty)?;

        Ok(NewGoal {
            client_id: client_id.to_string(),
            title: title.to_string(),
            difficulty,
            date,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: String,
    pub goals: Vec<Goal>,
    pub progress: crate::progress::Progress,
}

#[derive(Debug, Deserialize)]
pub struct ScreenshotRequest {
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct ScreenshotResponse {
    pub status: &'static str,
    pub filename: String,
}
