use crate::models::{ScoreLine, TeamSide, TeamStats};
use crate::store::MatchStore;
use crate::utils::{mean_or, points_fraction};

/// How many trailing matches count towards recent form.
pub const RECENT_FORM_WINDOW: usize = 3;

/// Aggregate and recent-form metrics over a team's full sample
/// (head-to-head matches followed by its own series).
pub fn calculate_team_stats(store: &MatchStore, side: TeamSide) -> TeamStats {
    let lines: Vec<ScoreLine> = store.season(side).map(|m| m.score_line(side)).collect();
    if lines.is_empty() {
        return TeamStats::default();
    }

    let goals_for: Vec<f64> = lines.iter().map(|l| l.goals_for as f64).collect();
    let goals_against: Vec<f64> = lines.iter().map(|l| l.goals_against as f64).collect();

    let recent = &lines[lines.len().saturating_sub(RECENT_FORM_WINDOW)..];

    TeamStats {
        avg_goals_for: mean_or(&goals_for, 0.0),
        avg_goals_against: mean_or(&goals_against, 0.0),
        form: points_fraction(form_points(&lines), lines.len(), 0.5),
        recent_form: points_fraction(form_points(recent), recent.len(), 0.5),
        matches_played: lines.len(),
    }
}

fn form_points(lines: &[ScoreLine]) -> u32 {
    lines.iter().map(|l| l.outcome().points()).sum()
}
