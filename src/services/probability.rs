use crate::models::{H2HStats, Location, MatchContext, Probabilities, TeamStats};
use crate::utils::{logistic, normalize_to};

pub const RECENT_FORM_WEIGHT: f64 = 2.5;
pub const H2H_WEIGHT: f64 = 2.0;
pub const OVERALL_PERFORMANCE_WEIGHT: f64 = 1.8;
pub const HOME_ADVANTAGE_WEIGHT: f64 = 1.5;
pub const MATCH_IMPORTANCE_WEIGHT: f64 = 1.2;

/// Raw home/away signal before weighting.
pub const HOME_ADVANTAGE_BONUS: f64 = 0.3;
/// Importance bonus per unit above a regular match.
pub const IMPORTANCE_BONUS_RATE: f64 = 0.1;

pub const BASE_DRAW_PROBABILITY: f64 = 0.35;
pub const DRAW_DECAY_PER_GOAL: f64 = 0.05;
pub const MIN_DRAW_PROBABILITY: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelWeights {
    pub recent_form: f64,
    pub h2h: f64,
    pub overall_performance: f64,
    pub home_advantage: f64,
    pub match_importance: f64,
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self {
            recent_form: RECENT_FORM_WEIGHT,
            h2h: H2H_WEIGHT,
            overall_performance: OVERALL_PERFORMANCE_WEIGHT,
            home_advantage: HOME_ADVANTAGE_WEIGHT,
            match_importance: MATCH_IMPORTANCE_WEIGHT,
        }
    }
}

/// Heuristic three-way outcome model.
///
/// Both win probabilities come from the same logistic advantage score, and the draw
/// is estimated separately from the expected scoring rate. The three raw values do
/// not form a joint distribution; they are simply rescaled to sum to 100.
pub struct ProbabilityModel {
    weights: ModelWeights,
}

impl ProbabilityModel {
    pub fn new() -> Self {
        Self::with_weights(ModelWeights::default())
    }

    pub fn with_weights(weights: ModelWeights) -> Self {
        Self { weights }
    }

    /// Weighted sum of the signals favouring team 1. Negative values favour team 2.
    pub fn team1_advantage(
        &self,
        team1: &TeamStats,
        team2: &TeamStats,
        h2h: &H2HStats,
        context: &MatchContext,
    ) -> f64 {
        let w = &self.weights;
        let mut advantage = 0.0;

        // Attack vs defense, once per direction
        advantage += (team1.avg_goals_for - team2.avg_goals_against) * w.overall_performance;
        advantage -= (team2.avg_goals_for - team1.avg_goals_against) * w.overall_performance;

        advantage += (team1.recent_form - team2.recent_form) * w.recent_form;
        advantage += h2h.advantage * w.h2h;

        match context.location {
            Location::Home => advantage += HOME_ADVANTAGE_BONUS * w.home_advantage,
            Location::Away => advantage -= HOME_ADVANTAGE_BONUS * w.home_advantage,
            Location::Neutral => {}
        }

        let importance_bonus = (context.importance - 1.0) * IMPORTANCE_BONUS_RATE;
        advantage += importance_bonus * w.match_importance;

        advantage
    }

    /// Draw likelihood shrinks as the combined scoring rate grows, floored at 5%.
    pub fn raw_draw_probability(team1: &TeamStats, team2: &TeamStats) -> f64 {
        let avg_goals = (team1.avg_goals_for
            + team2.avg_goals_for
            + team1.avg_goals_against
            + team2.avg_goals_against)
            / 4.0;
        (BASE_DRAW_PROBABILITY - avg_goals * DRAW_DECAY_PER_GOAL).max(MIN_DRAW_PROBABILITY)
    }

    pub fn predict(
        &self,
        team1: &TeamStats,
        team2: &TeamStats,
        h2h: &H2HStats,
        context: &MatchContext,
    ) -> Probabilities {
        let advantage = self.team1_advantage(team1, team2, h2h, context);

        let team1_win = logistic(advantage);
        let team2_win = logistic(-advantage);
        let draw = Self::raw_draw_probability(team1, team2);

        let normalized = normalize_to(&[team1_win, team2_win, draw], 100.0);

        Probabilities {
            team1_win: normalized[0],
            team2_win: normalized[1],
            draw: normalized[2],
        }
    }
}

impl Default for ProbabilityModel {
    fn default() -> Self {
        Self::new()
    }
}
