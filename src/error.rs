use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Need at least {need} total matches for analysis, have {have}")]
    InsufficientData { have: usize, need: usize },

    #[error("Invalid score '{0}' (numbers only)")]
    InvalidScore(String),

    #[error("Scores must be non-negative, got {0}")]
    NegativeScore(i64),

    #[error("Score {value} is above the maximum of {max}")]
    ScoreTooHigh { value: i64, max: u32 },

    #[error("Please enter at least one score for each team")]
    EmptyScores,

    #[error("Score lists differ in length ({left} vs {right})")]
    MismatchedScores { left: usize, right: usize },

    #[error("Invalid match context: {0}")]
    InvalidContext(String),
}

impl AnalysisError {
    /// True for errors caused by what the caller typed, as opposed to missing data.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, AnalysisError::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
