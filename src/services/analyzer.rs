use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::models::{
    AnalysisResult, DataStatus, MatchContext, PredictedOutcome, TeamSide, TotalLineVerdict,
};
use crate::services::{
    build_chart_data, calculate_h2h_stats, calculate_team_stats, extract_key_factors,
    performance_index, project_score, ChartData, ProbabilityModel,
};
use crate::store::{MatchStore, MIN_MATCHES_FOR_ANALYSIS};

/// Everything a front-end needs to present one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub context: MatchContext,
    pub data_status: DataStatus,
    pub result: AnalysisResult,
    pub predicted_outcome: PredictedOutcome,
    pub outcome_label: String,
    pub outcome_probability: f64,
    pub total_line: Option<TotalLineVerdict>,
    pub importance_label: String,
    pub venue: String,
    pub handicap: Option<String>,
    pub team1_performance: Vec<f64>,
    pub team2_performance: Vec<f64>,
    pub charts: ChartData,
}

pub struct MatchAnalyzer {
    probability_model: ProbabilityModel,
}

impl MatchAnalyzer {
    pub fn new() -> Self {
        Self {
            probability_model: ProbabilityModel::new(),
        }
    }

    /// Run every calculator over the store. Refuses to run on fewer than
    /// three matches across all collections.
    pub fn analyze(&self, store: &MatchStore, context: &MatchContext) -> Result<AnalysisResult> {
        let total = store.total_matches();
        if total < MIN_MATCHES_FOR_ANALYSIS {
            tracing::warn!(
                "Analysis refused: {} matches, need {}",
                total,
                MIN_MATCHES_FOR_ANALYSIS
            );
            return Err(AnalysisError::InsufficientData {
                have: total,
                need: MIN_MATCHES_FOR_ANALYSIS,
            });
        }

        let team1_stats = calculate_team_stats(store, TeamSide::Team1);
        let team2_stats = calculate_team_stats(store, TeamSide::Team2);
        let h2h_stats = calculate_h2h_stats(store.head_to_head());

        let probabilities =
            self.probability_model
                .predict(&team1_stats, &team2_stats, &h2h_stats, context);
        let projected_score = project_score(
            &team1_stats,
            &team2_stats,
            &h2h_stats,
            store.head_to_head(),
            context,
        );
        let key_factors = extract_key_factors(&team1_stats, &team2_stats, &h2h_stats, context);
        tracing::debug!("Probability total after normalization: {:.6}", probabilities.sum());

        tracing::info!(
            "Analysis for {} vs {}: {} {:.1}%, Draw {:.1}%, {} {:.1}%",
            context.team1_name,
            context.team2_name,
            context.team1_name,
            probabilities.team1_win,
            probabilities.draw,
            context.team2_name,
            probabilities.team2_win
        );

        Ok(AnalysisResult {
            team1_stats,
            team2_stats,
            h2h_stats,
            probabilities,
            projected_score,
            key_factors,
        })
    }

    /// Analysis plus the derived presentation data: outcome, total-line verdict,
    /// performance trends and chart series.
    pub fn report(&self, store: &MatchStore, context: &MatchContext) -> Result<AnalysisReport> {
        let result = self.analyze(store, context)?;

        let team1_performance = performance_index(store, TeamSide::Team1);
        let team2_performance = performance_index(store, TeamSide::Team2);
        let charts = build_chart_data(
            store,
            context,
            &result,
            &team1_performance,
            &team2_performance,
        );

        let (predicted_outcome, outcome_probability) = result.most_likely_outcome();
        let outcome_label = match predicted_outcome {
            PredictedOutcome::Team1Win => format!("{} Win", context.team1_name),
            PredictedOutcome::Team2Win => format!("{} Win", context.team2_name),
            PredictedOutcome::Draw => "Draw".to_string(),
        };

        Ok(AnalysisReport {
            context: context.clone(),
            data_status: store.data_status(),
            total_line: result.total_line_verdict(context.total_line),
            predicted_outcome,
            outcome_label,
            outcome_probability,
            importance_label: context.importance_label().to_string(),
            venue: context.venue_label(),
            handicap: context.handicap_summary(),
            team1_performance,
            team2_performance,
            charts,
            result,
        })
    }
}

impl Default for MatchAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sample_data;

    #[test]
    fn test_empty_store_is_insufficient() {
        let err = MatchAnalyzer::new()
            .analyze(&MatchStore::new(), &MatchContext::default())
            .unwrap_err();
        assert_eq!(err, AnalysisError::InsufficientData { have: 0, need: 3 });
    }

    #[test]
    fn test_two_matches_are_insufficient() {
        let mut store = MatchStore::new();
        store.set_head_to_head(&[1], &[0]).unwrap();
        store.set_team_series(TeamSide::Team2, &[2], &[2]).unwrap();
        let err = MatchAnalyzer::new().report(&store, &MatchContext::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { have: 2, .. }));
    }

    #[test]
    fn test_three_matches_in_one_collection_suffice() {
        let mut store = MatchStore::new();
        store.set_team_series(TeamSide::Team1, &[1, 2, 0], &[0, 0, 0]).unwrap();
        let result = MatchAnalyzer::new().analyze(&store, &MatchContext::default()).unwrap();
        // team 2 has nothing and falls back to neutral stats
        assert_eq!(result.team2_stats.matches_played, 0);
        assert_eq!(result.team2_stats.form, 0.5);
        assert_eq!(result.h2h_stats.avg_total_goals, 2.5);
        assert!((result.probabilities.sum() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_analysis() {
        let (store, context) = sample_data().unwrap();
        let result = MatchAnalyzer::new().analyze(&store, &context).unwrap();

        assert!((result.team1_stats.avg_goals_for - 1.9).abs() < 1e-9);
        assert!((result.team1_stats.avg_goals_against - 0.9).abs() < 1e-9);
        assert_eq!(result.h2h_stats.total_matches, 5);
        assert!((result.probabilities.sum() - 100.0).abs() < 1e-9);
        assert!(result.probabilities.team1_win > result.probabilities.team2_win);
        assert!(result.projected_score.team1_goals >= 0.0);
        assert!(result
            .key_factors
            .windows(2)
            .all(|w| w[0].impact >= w[1].impact));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let (store, context) = sample_data().unwrap();
        let analyzer = MatchAnalyzer::new();
        let first = analyzer.analyze(&store, &context).unwrap();
        let second = analyzer.analyze(&store, &context).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_report() {
        let (store, context) = sample_data().unwrap();
        let report = MatchAnalyzer::new().report(&store, &context).unwrap();

        assert_eq!(report.predicted_outcome, PredictedOutcome::Team1Win);
        assert_eq!(report.outcome_label, "Arsenal Win");
        assert_eq!(report.outcome_probability, report.result.probabilities.team1_win);
        let verdict = report.total_line.unwrap();
        assert!(verdict.over);
        assert_eq!(report.venue, "Neutral Venue");
        assert_eq!(report.importance_label, "Regular Match");
        assert_eq!(report.handicap.as_deref(), Some("Arsenal -0.5, Chelsea +0.5"));
        assert_eq!(report.team1_performance.len(), 10);
        assert_eq!(report.team2_performance.len(), 10);
    }
}
