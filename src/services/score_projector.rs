use crate::models::{H2HStats, MatchContext, MatchRecord, ProjectedScore, TeamSide, TeamStats};
use crate::utils::mean_or;

/// Head-to-head blend weight per recorded meeting.
pub const H2H_BLEND_PER_MATCH: f64 = 0.1;
pub const MAX_H2H_BLEND: f64 = 0.4;
/// Form scaling runs from 0.8 (no points) to 1.2 (all wins).
pub const FORM_SCALE_BASE: f64 = 0.8;
pub const FORM_SCALE_RANGE: f64 = 0.4;
pub const HOME_GOALS_MULTIPLIER: f64 = 1.1;

/// Projected final score from attack/defense averages, nudged towards the
/// head-to-head scoreline, scaled by recent form and home advantage.
pub fn project_score(
    team1: &TeamStats,
    team2: &TeamStats,
    h2h: &H2HStats,
    h2h_matches: &[MatchRecord],
    context: &MatchContext,
) -> ProjectedScore {
    let mut team1_goals = (team1.avg_goals_for + team2.avg_goals_against) / 2.0;
    let mut team2_goals = (team2.avg_goals_for + team1.avg_goals_against) / 2.0;

    if h2h.total_matches > 0 {
        let weight = (h2h.total_matches as f64 * H2H_BLEND_PER_MATCH).min(MAX_H2H_BLEND);
        let h2h_team1 = h2h_average(h2h_matches, TeamSide::Team1);
        let h2h_team2 = h2h_average(h2h_matches, TeamSide::Team2);

        team1_goals = team1_goals * (1.0 - weight) + h2h_team1 * weight;
        team2_goals = team2_goals * (1.0 - weight) + h2h_team2 * weight;
    }

    team1_goals *= FORM_SCALE_BASE + team1.recent_form * FORM_SCALE_RANGE;
    team2_goals *= FORM_SCALE_BASE + team2.recent_form * FORM_SCALE_RANGE;

    match context.home_side() {
        Some(TeamSide::Team1) => team1_goals *= HOME_GOALS_MULTIPLIER,
        Some(TeamSide::Team2) => team2_goals *= HOME_GOALS_MULTIPLIER,
        None => {}
    }

    let team1_goals = team1_goals.max(0.0);
    let team2_goals = team2_goals.max(0.0);

    ProjectedScore {
        team1_goals,
        team2_goals,
        total_goals: team1_goals + team2_goals,
    }
}

fn h2h_average(matches: &[MatchRecord], side: TeamSide) -> f64 {
    let goals: Vec<f64> = matches
        .iter()
        .map(|m| m.score_line(side).goals_for as f64)
        .collect();
    mean_or(&goals, 0.0)
}
