use crate::models::{MatchOutcome, ScoreLine, TeamSide};
use crate::store::MatchStore;
use crate::utils::trailing_average;

pub const PERFORMANCE_WINDOW: usize = 3;

/// Single-match score on a 0-100 scale: result band, goal-difference bonus,
/// an attack bonus and a defense penalty.
pub fn match_performance(line: ScoreLine) -> f64 {
    let goals_for = line.goals_for as f64;
    let goals_against = line.goals_against as f64;
    let goal_diff = (goals_for - goals_against).abs();

    let mut performance = match line.outcome() {
        MatchOutcome::Win => 70.0 + (goal_diff * 10.0).min(30.0),
        MatchOutcome::Loss => 30.0 - (goal_diff * 10.0).min(30.0),
        MatchOutcome::Draw => 50.0,
    };

    performance += (goals_for * 2.0).min(10.0);
    performance -= (goals_against * 2.5).min(15.0);

    performance.clamp(0.0, 100.0)
}

/// Smoothed performance trend over a team's full sample, one value per match,
/// each the mean of the last three raw scores up to that match.
pub fn performance_index(store: &MatchStore, side: TeamSide) -> Vec<f64> {
    let raw: Vec<f64> = store
        .season(side)
        .map(|m| match_performance(m.score_line(side)))
        .collect();
    trailing_average(&raw, PERFORMANCE_WINDOW)
}
