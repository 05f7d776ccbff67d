pub mod seed;
pub use seed::sample_data;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::models::{Collection, DataStatus, MatchRecord, TeamSide};
use crate::utils::checked_score;

pub const MIN_MATCHES_FOR_ANALYSIS: usize = 3;

/// In-memory match history for one analysis: head-to-head matches plus each
/// team's own series against other opponents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchStore {
    h2h: Vec<MatchRecord>,
    team1: Vec<MatchRecord>,
    team2: Vec<MatchRecord>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the head-to-head collection. Returns the number of matches stored.
    pub fn set_head_to_head(&mut self, team1_scores: &[u32], team2_scores: &[u32]) -> Result<usize> {
        validate_pair(team1_scores, team2_scores)?;
        let timestamps = synthetic_timestamps(team1_scores.len());

        self.h2h = team1_scores
            .iter()
            .zip(team2_scores)
            .zip(timestamps)
            .enumerate()
            .map(|(i, ((&t1, &t2), ts))| MatchRecord::head_to_head(t1, t2, i + 1, ts))
            .collect();

        tracing::debug!("Stored {} head-to-head matches", self.h2h.len());
        Ok(self.h2h.len())
    }

    /// Replace one team's series against other opponents.
    pub fn set_team_series(
        &mut self,
        side: TeamSide,
        team_scores: &[u32],
        opponent_scores: &[u32],
    ) -> Result<usize> {
        validate_pair(team_scores, opponent_scores)?;
        let timestamps = synthetic_timestamps(team_scores.len());

        let records: Vec<MatchRecord> = team_scores
            .iter()
            .zip(opponent_scores)
            .zip(timestamps)
            .enumerate()
            .map(|(i, ((&own, &opp), ts))| MatchRecord::single_team(own, opp, i + 1, ts))
            .collect();
        let count = records.len();

        match side {
            TeamSide::Team1 => self.team1 = records,
            TeamSide::Team2 => self.team2 = records,
        }

        tracing::debug!("Stored {} matches for {:?}", count, side);
        Ok(count)
    }

    pub fn set_collection(&mut self, collection: Collection, left: &[u32], right: &[u32]) -> Result<usize> {
        match collection {
            Collection::H2h => self.set_head_to_head(left, right),
            Collection::Team1 => self.set_team_series(TeamSide::Team1, left, right),
            Collection::Team2 => self.set_team_series(TeamSide::Team2, left, right),
        }
    }

    pub fn clear(&mut self) {
        self.h2h.clear();
        self.team1.clear();
        self.team2.clear();
        tracing::debug!("All match data cleared");
    }

    pub fn head_to_head(&self) -> &[MatchRecord] {
        &self.h2h
    }

    pub fn team_series(&self, side: TeamSide) -> &[MatchRecord] {
        match side {
            TeamSide::Team1 => &self.team1,
            TeamSide::Team2 => &self.team2,
        }
    }

    /// A team's full sample: head-to-head matches first, then its own series.
    pub fn season(&self, side: TeamSide) -> impl Iterator<Item = &MatchRecord> + '_ {
        self.h2h.iter().chain(self.team_series(side))
    }

    pub fn season_len(&self, side: TeamSide) -> usize {
        self.h2h.len() + self.team_series(side).len()
    }

    pub fn total_matches(&self) -> usize {
        self.h2h.len() + self.team1.len() + self.team2.len()
    }

    pub fn data_status(&self) -> DataStatus {
        let total = self.total_matches();
        DataStatus {
            h2h_count: self.h2h.len(),
            team1_count: self.team1.len(),
            team2_count: self.team2.len(),
            total,
            sufficient: total >= MIN_MATCHES_FOR_ANALYSIS,
            matches_needed: MIN_MATCHES_FOR_ANALYSIS.saturating_sub(total),
        }
    }
}

fn validate_pair(left: &[u32], right: &[u32]) -> Result<()> {
    if left.is_empty() || right.is_empty() {
        return Err(AnalysisError::EmptyScores);
    }
    if left.len() != right.len() {
        return Err(AnalysisError::MismatchedScores {
            left: left.len(),
            right: right.len(),
        });
    }
    for &score in left.iter().chain(right) {
        checked_score(i64::from(score))?;
    }
    Ok(())
}

/// One week apart, the last match one week before now.
fn synthetic_timestamps(count: usize) -> Vec<DateTime<Utc>> {
    let now = Utc::now();
    (0..count)
        .map(|i| now - Duration::weeks((count - i) as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_head_to_head_numbers_and_totals() {
        let mut store = MatchStore::new();
        let stored = store.set_head_to_head(&[2, 1, 3], &[1, 2, 1]).unwrap();
        assert_eq!(stored, 3);

        let numbers: Vec<usize> = store.head_to_head().iter().map(|m| m.match_number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        let totals: Vec<u32> = store.head_to_head().iter().map(|m| m.total_score()).collect();
        assert_eq!(totals, vec![3, 3, 4]);

        let stamps: Vec<_> = store.head_to_head().iter().map(|m| m.timestamp()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
        assert!(stamps[2] < Utc::now());
    }

    #[test]
    fn test_new_batch_replaces_collection() {
        let mut store = MatchStore::new();
        store.set_team_series(TeamSide::Team1, &[1, 2, 3, 4], &[0, 0, 0, 0]).unwrap();
        store.set_team_series(TeamSide::Team1, &[5], &[5]).unwrap();
        assert_eq!(store.team_series(TeamSide::Team1).len(), 1);
        assert_eq!(store.team_series(TeamSide::Team1)[0].match_number(), 1);
        assert!(store.team_series(TeamSide::Team2).is_empty());
    }

    #[test]
    fn test_rejects_empty_and_mismatched_lists() {
        let mut store = MatchStore::new();
        assert_eq!(store.set_head_to_head(&[], &[1]), Err(AnalysisError::EmptyScores));
        assert_eq!(
            store.set_collection(Collection::Team2, &[1, 2], &[1]),
            Err(AnalysisError::MismatchedScores { left: 2, right: 1 })
        );
        assert_eq!(store.total_matches(), 0);
    }

    #[test]
    fn test_failed_batch_keeps_previous_data() {
        let mut store = MatchStore::new();
        store.set_head_to_head(&[1, 1], &[0, 0]).unwrap();
        assert!(store.set_head_to_head(&[1], &[]).is_err());
        assert_eq!(store.head_to_head().len(), 2);
    }

    #[test]
    fn test_out_of_range_scores_are_rejected() {
        let mut store = MatchStore::new();
        assert_eq!(
            store.set_head_to_head(&[u32::MAX], &[1]),
            Err(AnalysisError::ScoreTooHigh { value: i64::from(u32::MAX), max: 999 })
        );
        assert!(store.set_team_series(TeamSide::Team2, &[1], &[1000]).is_err());
        assert_eq!(store.total_matches(), 0);

        store.set_head_to_head(&[999], &[999]).unwrap();
        assert_eq!(store.head_to_head()[0].total_score(), 1998);
    }

    #[test]
    fn test_season_is_h2h_then_own_series() {
        let mut store = MatchStore::new();
        store.set_head_to_head(&[2], &[1]).unwrap();
        store.set_team_series(TeamSide::Team2, &[4, 5], &[0, 0]).unwrap();

        let season: Vec<u32> = store
            .season(TeamSide::Team2)
            .map(|m| m.score_line(TeamSide::Team2).goals_for)
            .collect();
        assert_eq!(season, vec![1, 4, 5]);
        assert_eq!(store.season_len(TeamSide::Team1), 1);
    }

    #[test]
    fn test_data_status_and_clear() {
        let mut store = MatchStore::new();
        store.set_head_to_head(&[1], &[1]).unwrap();
        let status = store.data_status();
        assert_eq!(status.total, 1);
        assert!(!status.sufficient);
        assert_eq!(status.matches_needed, 2);

        store.set_team_series(TeamSide::Team1, &[1, 2], &[0, 0]).unwrap();
        let status = store.data_status();
        assert!(status.sufficient);
        assert_eq!(status.matches_needed, 0);

        store.clear();
        assert_eq!(store.total_matches(), 0);
    }
}
