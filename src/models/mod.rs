use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AnalysisError, Result};
use crate::utils::{format_signed, importance_text, validate_team_name};

pub const DEFAULT_TEAM1_NAME: &str = "Team 1";
pub const DEFAULT_TEAM2_NAME: &str = "Team 2";

/// One of the two analyzed teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Team1,
    Team2,
}

/// The three match collections a store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    H2h,
    Team1,
    Team2,
}

impl FromStr for Collection {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "h2h" => Ok(Collection::H2h),
            "team1" => Ok(Collection::Team1),
            "team2" => Ok(Collection::Team2),
            other => Err(AnalysisError::InvalidContext(format!(
                "unknown collection '{}', use h2h, team1 or team2",
                other
            ))),
        }
    }
}

/// Win / draw / loss from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    /// League points: 3 for a win, 1 for a draw.
    pub fn points(self) -> u32 {
        match self {
            MatchOutcome::Win => 3,
            MatchOutcome::Draw => 1,
            MatchOutcome::Loss => 0,
        }
    }
}

/// Goals for and against, resolved for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreLine {
    pub goals_for: u32,
    pub goals_against: u32,
}

impl ScoreLine {
    pub fn outcome(&self) -> MatchOutcome {
        match self.goals_for.cmp(&self.goals_against) {
            std::cmp::Ordering::Greater => MatchOutcome::Win,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
            std::cmp::Ordering::Less => MatchOutcome::Loss,
        }
    }
}

/// A stored match. The shape is fixed when the record is created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchRecord {
    /// Played between the two analyzed teams.
    HeadToHead {
        team1_score: u32,
        team2_score: u32,
        total_score: u32,
        match_number: usize,
        timestamp: DateTime<Utc>,
    },
    /// Played by one analyzed team against somebody else.
    SingleTeam {
        team_score: u32,
        opponent_score: u32,
        total_score: u32,
        match_number: usize,
        timestamp: DateTime<Utc>,
    },
}

impl MatchRecord {
    pub fn head_to_head(
        team1_score: u32,
        team2_score: u32,
        match_number: usize,
        timestamp: DateTime<Utc>,
    ) -> Self {
        MatchRecord::HeadToHead {
            team1_score,
            team2_score,
            total_score: team1_score + team2_score,
            match_number,
            timestamp,
        }
    }

    pub fn single_team(
        team_score: u32,
        opponent_score: u32,
        match_number: usize,
        timestamp: DateTime<Utc>,
    ) -> Self {
        MatchRecord::SingleTeam {
            team_score,
            opponent_score,
            total_score: team_score + opponent_score,
            match_number,
            timestamp,
        }
    }

    /// Goals for/against from `side`'s point of view. Every calculator that walks
    /// records goes through here.
    pub fn score_line(&self, side: TeamSide) -> ScoreLine {
        match *self {
            MatchRecord::HeadToHead {
                team1_score,
                team2_score,
                ..
            } => match side {
                TeamSide::Team1 => ScoreLine {
                    goals_for: team1_score,
                    goals_against: team2_score,
                },
                TeamSide::Team2 => ScoreLine {
                    goals_for: team2_score,
                    goals_against: team1_score,
                },
            },
            // Single-team records only ever appear in their own team's series.
            MatchRecord::SingleTeam {
                team_score,
                opponent_score,
                ..
            } => ScoreLine {
                goals_for: team_score,
                goals_against: opponent_score,
            },
        }
    }

    pub fn total_score(&self) -> u32 {
        match *self {
            MatchRecord::HeadToHead { total_score, .. } => total_score,
            MatchRecord::SingleTeam { total_score, .. } => total_score,
        }
    }

    pub fn match_number(&self) -> usize {
        match *self {
            MatchRecord::HeadToHead { match_number, .. } => match_number,
            MatchRecord::SingleTeam { match_number, .. } => match_number,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match *self {
            MatchRecord::HeadToHead { timestamp, .. } => timestamp,
            MatchRecord::SingleTeam { timestamp, .. } => timestamp,
        }
    }

    /// Result label used by match listings: "team1-win" / "team2-win" / "draw" for
    /// head-to-head records, "win" / "loss" / "draw" otherwise.
    pub fn result_label(&self) -> &'static str {
        match self {
            MatchRecord::HeadToHead { .. } => match self.score_line(TeamSide::Team1).outcome() {
                MatchOutcome::Win => "team1-win",
                MatchOutcome::Loss => "team2-win",
                MatchOutcome::Draw => "draw",
            },
            MatchRecord::SingleTeam { .. } => match self.score_line(TeamSide::Team1).outcome() {
                MatchOutcome::Win => "win",
                MatchOutcome::Loss => "loss",
                MatchOutcome::Draw => "draw",
            },
        }
    }
}

/// Venue, always from team 1's point of view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Home,
    Away,
    #[default]
    Neutral,
}

impl FromStr for Location {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(Location::Home),
            "away" => Ok(Location::Away),
            "neutral" | "" => Ok(Location::Neutral),
            other => Err(AnalysisError::InvalidContext(format!(
                "unknown location '{}', use home, away or neutral",
                other
            ))),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Location::Home => "home",
            Location::Away => "away",
            Location::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchContext {
    pub team1_name: String,
    pub team2_name: String,
    pub location: Location,
    pub importance: f64,
    /// Over/under line, 0 means unset.
    pub total_line: f64,
    pub team1_handicap: f64,
    pub team2_handicap: f64,
}

impl Default for MatchContext {
    fn default() -> Self {
        Self {
            team1_name: DEFAULT_TEAM1_NAME.to_string(),
            team2_name: DEFAULT_TEAM2_NAME.to_string(),
            location: Location::Neutral,
            importance: 1.0,
            total_line: 0.0,
            team1_handicap: 0.0,
            team2_handicap: 0.0,
        }
    }
}

impl MatchContext {
    pub fn new(team1_name: &str, team2_name: &str) -> Self {
        Self {
            team1_name: team1_name.to_string(),
            team2_name: team2_name.to_string(),
            ..Self::default()
        }
        .normalized()
    }

    /// Blank names fall back to the defaults.
    pub fn normalized(mut self) -> Self {
        if self.team1_name.trim().is_empty() {
            self.team1_name = DEFAULT_TEAM1_NAME.to_string();
        }
        if self.team2_name.trim().is_empty() {
            self.team2_name = DEFAULT_TEAM2_NAME.to_string();
        }
        self.team1_name = self.team1_name.trim().to_string();
        self.team2_name = self.team2_name.trim().to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !validate_team_name(&self.team1_name) || !validate_team_name(&self.team2_name) {
            return Err(AnalysisError::InvalidContext(
                "team names must be at most 100 characters".to_string(),
            ));
        }
        if !self.importance.is_finite() || self.importance <= 0.0 {
            return Err(AnalysisError::InvalidContext(format!(
                "importance must be a positive number, got {}",
                self.importance
            )));
        }
        if !self.total_line.is_finite() || self.total_line < 0.0 {
            return Err(AnalysisError::InvalidContext(format!(
                "total line must be zero or positive, got {}",
                self.total_line
            )));
        }
        if !self.team1_handicap.is_finite() || !self.team2_handicap.is_finite() {
            return Err(AnalysisError::InvalidContext(
                "handicaps must be finite numbers".to_string(),
            ));
        }
        Ok(())
    }

    pub fn team_name(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::Team1 => &self.team1_name,
            TeamSide::Team2 => &self.team2_name,
        }
    }

    /// The team playing at home, if any.
    pub fn home_side(&self) -> Option<TeamSide> {
        match self.location {
            Location::Home => Some(TeamSide::Team1),
            Location::Away => Some(TeamSide::Team2),
            Location::Neutral => None,
        }
    }

    pub fn venue_label(&self) -> String {
        match self.home_side() {
            Some(side) => format!("{} Home", self.team_name(side)),
            None => "Neutral Venue".to_string(),
        }
    }

    pub fn importance_label(&self) -> &'static str {
        importance_text(self.importance)
    }

    pub fn has_total_line(&self) -> bool {
        self.total_line > 0.0
    }

    /// "Arsenal -0.5, Chelsea +0.5", or None when neither handicap is set.
    pub fn handicap_summary(&self) -> Option<String> {
        if self.team1_handicap == 0.0 && self.team2_handicap == 0.0 {
            return None;
        }
        Some(format!(
            "{} {}, {} {}",
            self.team1_name,
            format_signed(self.team1_handicap),
            self.team2_name,
            format_signed(self.team2_handicap)
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub form: f64,
    pub recent_form: f64,
    pub matches_played: usize,
}

impl Default for TeamStats {
    /// No information reads as 50% form, not zero.
    fn default() -> Self {
        Self {
            avg_goals_for: 0.0,
            avg_goals_against: 0.0,
            form: 0.5,
            recent_form: 0.5,
            matches_played: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct H2HStats {
    pub team1_wins: usize,
    pub team2_wins: usize,
    pub draws: usize,
    pub avg_total_goals: f64,
    pub advantage: f64,
    pub total_matches: usize,
}

impl Default for H2HStats {
    fn default() -> Self {
        Self {
            team1_wins: 0,
            team2_wins: 0,
            draws: 0,
            avg_total_goals: 2.5,
            advantage: 0.0,
            total_matches: 0,
        }
    }
}

/// Outcome percentages, summing to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub team1_win: f64,
    pub team2_win: f64,
    pub draw: f64,
}

impl Probabilities {
    pub fn sum(&self) -> f64 {
        self.team1_win + self.team2_win + self.draw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedScore {
    pub team1_goals: f64,
    pub team2_goals: f64,
    pub total_goals: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFactor {
    pub title: String,
    pub description: String,
    pub impact: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedOutcome {
    Team1Win,
    Team2Win,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalLineVerdict {
    pub line: f64,
    pub projected_total: f64,
    pub over: bool,
    pub margin: f64,
}

impl TotalLineVerdict {
    pub fn label(&self) -> &'static str {
        if self.over {
            "OVER"
        } else {
            "UNDER"
        }
    }
}

/// Snapshot of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub team1_stats: TeamStats,
    pub team2_stats: TeamStats,
    pub h2h_stats: H2HStats,
    pub probabilities: Probabilities,
    pub projected_score: ProjectedScore,
    pub key_factors: Vec<KeyFactor>,
}

impl AnalysisResult {
    /// Highest probability wins; ties go to team 1, then team 2, then the draw.
    pub fn most_likely_outcome(&self) -> (PredictedOutcome, f64) {
        let p = &self.probabilities;
        let max = p.team1_win.max(p.team2_win).max(p.draw);
        if max == p.team1_win {
            (PredictedOutcome::Team1Win, max)
        } else if max == p.team2_win {
            (PredictedOutcome::Team2Win, max)
        } else {
            (PredictedOutcome::Draw, max)
        }
    }

    pub fn total_line_verdict(&self, line: f64) -> Option<TotalLineVerdict> {
        if line <= 0.0 {
            return None;
        }
        let projected_total = self.projected_score.total_goals;
        Some(TotalLineVerdict {
            line,
            projected_total,
            over: projected_total > line,
            margin: (projected_total - line).abs(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStatus {
    pub h2h_count: usize,
    pub team1_count: usize,
    pub team2_count: usize,
    pub total: usize,
    pub sufficient: bool,
    pub matches_needed: usize,
}

// API Response types
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}
