use crate::models::{H2HStats, KeyFactor, MatchContext, TeamSide, TeamStats};

pub const FORM_DIFF_THRESHOLD: f64 = 0.2;
pub const MATCHUP_THRESHOLD: f64 = 0.5;
pub const H2H_MIN_MATCHES: usize = 3;
pub const H2H_ADVANTAGE_THRESHOLD: f64 = 0.3;
pub const HOME_ADVANTAGE_IMPACT: f64 = 0.3;
pub const HIGH_STAKES_THRESHOLD: f64 = 1.2;
pub const SCORING_TREND_THRESHOLD: f64 = 1.0;

/// Human-readable explanations of the asymmetries between the two teams,
/// highest impact first. An empty list means nothing stood out.
pub fn extract_key_factors(
    team1: &TeamStats,
    team2: &TeamStats,
    h2h: &H2HStats,
    context: &MatchContext,
) -> Vec<KeyFactor> {
    let mut factors = Vec::new();

    let form_diff = team1.recent_form - team2.recent_form;
    if form_diff.abs() > FORM_DIFF_THRESHOLD {
        let better = leader(form_diff, context);
        factors.push(KeyFactor {
            title: "Recent Form Advantage".to_string(),
            description: format!("{} shows significantly better recent form", better),
            impact: form_diff.abs(),
        });
    }

    let team1_matchup = team1.avg_goals_for - team2.avg_goals_against;
    let team2_matchup = team2.avg_goals_for - team1.avg_goals_against;
    let matchup_diff = team1_matchup - team2_matchup;
    if matchup_diff.abs() > MATCHUP_THRESHOLD {
        let stronger = leader(matchup_diff, context);
        factors.push(KeyFactor {
            title: "Attack vs Defense Matchup".to_string(),
            description: format!("{} has a favorable attack vs defense matchup", stronger),
            impact: matchup_diff.abs() / 2.0,
        });
    }

    if h2h.total_matches >= H2H_MIN_MATCHES && h2h.advantage.abs() > H2H_ADVANTAGE_THRESHOLD {
        let dominant = leader(h2h.advantage, context);
        factors.push(KeyFactor {
            title: "Head-to-Head Dominance".to_string(),
            description: format!("{} has historically dominated this matchup", dominant),
            impact: h2h.advantage.abs(),
        });
    }

    if let Some(home) = context.home_side() {
        factors.push(KeyFactor {
            title: "Home Advantage".to_string(),
            description: format!(
                "{} playing at home provides tactical and psychological benefits",
                context.team_name(home)
            ),
            impact: HOME_ADVANTAGE_IMPACT,
        });
    }

    if context.importance > HIGH_STAKES_THRESHOLD {
        factors.push(KeyFactor {
            title: "High-Stakes Match".to_string(),
            description: "Important match may lead to more cautious play and potential surprises"
                .to_string(),
            impact: (context.importance - 1.0) * 0.5,
        });
    }

    let scoring_diff = (team1.avg_goals_for + team2.avg_goals_for)
        - (team1.avg_goals_against + team2.avg_goals_against);
    if scoring_diff > SCORING_TREND_THRESHOLD {
        factors.push(KeyFactor {
            title: "High-Scoring Potential".to_string(),
            description: "Both teams show strong attacking capabilities".to_string(),
            impact: scoring_diff / 4.0,
        });
    } else if scoring_diff < -SCORING_TREND_THRESHOLD {
        factors.push(KeyFactor {
            title: "Defensive Battle Expected".to_string(),
            description: "Both teams have strong defensive records".to_string(),
            impact: scoring_diff.abs() / 4.0,
        });
    }

    // Stable sort keeps encounter order on ties
    factors.sort_by(|a, b| b.impact.partial_cmp(&a.impact).unwrap_or(std::cmp::Ordering::Equal));
    factors
}

/// Team 1 when the signal is positive, team 2 otherwise.
fn leader(signal: f64, context: &MatchContext) -> &str {
    if signal > 0.0 {
        context.team_name(TeamSide::Team1)
    } else {
        context.team_name(TeamSide::Team2)
    }
}
