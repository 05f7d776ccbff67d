use crate::models::{H2HStats, MatchOutcome, MatchRecord, TeamSide};
use crate::utils::mean_or;

/// Win/draw/loss tally and scoring rate of the head-to-head collection.
/// An empty collection yields the neutral prior of 2.5 goals and no advantage.
pub fn calculate_h2h_stats(matches: &[MatchRecord]) -> H2HStats {
    if matches.is_empty() {
        return H2HStats::default();
    }

    let mut team1_wins = 0;
    let mut team2_wins = 0;
    let mut draws = 0;

    for record in matches {
        match record.score_line(TeamSide::Team1).outcome() {
            MatchOutcome::Win => team1_wins += 1,
            MatchOutcome::Loss => team2_wins += 1,
            MatchOutcome::Draw => draws += 1,
        }
    }

    let totals: Vec<f64> = matches.iter().map(|m| m.total_score() as f64).collect();
    let total_matches = matches.len();

    H2HStats {
        team1_wins,
        team2_wins,
        draws,
        avg_total_goals: mean_or(&totals, 2.5),
        advantage: (team1_wins as f64 - team2_wins as f64) / total_matches as f64,
        total_matches,
    }
}
