use crate::error::Result;
use crate::models::{Location, MatchContext, TeamSide};
use crate::store::MatchStore;

/// Arsenal vs Chelsea demo fixture.
pub fn sample_data() -> Result<(MatchStore, MatchContext)> {
    let mut store = MatchStore::new();
    store.set_head_to_head(&[2, 1, 3, 0, 2], &[1, 2, 1, 1, 0])?;
    store.set_team_series(TeamSide::Team1, &[3, 2, 1, 2, 3], &[1, 0, 1, 0, 2])?;
    store.set_team_series(TeamSide::Team2, &[2, 3, 1, 0, 2], &[0, 1, 0, 2, 1])?;

    let context = MatchContext {
        location: Location::Neutral,
        importance: 1.0,
        total_line: 2.5,
        team1_handicap: -0.5,
        team2_handicap: 0.5,
        ..MatchContext::new("Arsenal", "Chelsea")
    };

    tracing::info!(
        "Loaded sample data: {} vs {} ({} matches)",
        context.team1_name,
        context.team2_name,
        store.total_matches()
    );

    Ok((store, context))
}
