use serde::Serialize;

use crate::models::{AnalysisResult, Collection, MatchContext, MatchRecord, TeamSide};
use crate::store::MatchStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalScoreBar {
    pub label: String,
    pub total: u32,
    pub category: Collection,
    /// Set only when a total line is configured.
    pub over_line: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilitySlice {
    pub label: String,
    pub value: f64,
}

/// Chart-ready series for the rendering layer. Pure data, nothing is drawn here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub head_to_head: LineChart,
    pub team1: LineChart,
    pub team2: LineChart,
    pub totals: Vec<TotalScoreBar>,
    pub performance: LineChart,
    pub probabilities: Vec<ProbabilitySlice>,
}

/// Flat row for CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub chart: String,
    pub label: String,
    pub series: String,
    pub value: f64,
}

pub fn build_chart_data(
    store: &MatchStore,
    context: &MatchContext,
    result: &AnalysisResult,
    team1_performance: &[f64],
    team2_performance: &[f64],
) -> ChartData {
    let h2h = store.head_to_head();
    let head_to_head = LineChart {
        title: "Head-to-Head Performance".to_string(),
        labels: match_labels(h2h.len()),
        series: vec![
            goals_series(&context.team1_name, h2h, TeamSide::Team1, false),
            goals_series(&context.team2_name, h2h, TeamSide::Team2, false),
        ],
    };

    let performance_len = team1_performance.len().max(team2_performance.len());
    let performance = LineChart {
        title: "Performance Index Over Time".to_string(),
        labels: match_labels(performance_len),
        series: vec![
            LineSeries {
                name: format!("{} Performance Index", context.team1_name),
                values: team1_performance.to_vec(),
            },
            LineSeries {
                name: format!("{} Performance Index", context.team2_name),
                values: team2_performance.to_vec(),
            },
        ],
    };

    let p = &result.probabilities;
    let probabilities = vec![
        ProbabilitySlice {
            label: format!("{} Win", context.team1_name),
            value: p.team1_win,
        },
        ProbabilitySlice {
            label: "Draw".to_string(),
            value: p.draw,
        },
        ProbabilitySlice {
            label: format!("{} Win", context.team2_name),
            value: p.team2_win,
        },
    ];

    ChartData {
        head_to_head,
        team1: team_chart(store, context, TeamSide::Team1),
        team2: team_chart(store, context, TeamSide::Team2),
        totals: total_score_bars(store, context),
        performance,
        probabilities,
    }
}

fn match_labels(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("Match {}", n)).collect()
}

fn goals_series(name: &str, matches: &[MatchRecord], side: TeamSide, conceded: bool) -> LineSeries {
    LineSeries {
        name: name.to_string(),
        values: matches
            .iter()
            .map(|m| {
                let line = m.score_line(side);
                if conceded {
                    line.goals_against as f64
                } else {
                    line.goals_for as f64
                }
            })
            .collect(),
    }
}

fn team_chart(store: &MatchStore, context: &MatchContext, side: TeamSide) -> LineChart {
    let series = store.team_series(side);
    let name = context.team_name(side);
    LineChart {
        title: format!("{} vs Opponents", name),
        labels: match_labels(series.len()),
        series: vec![
            goals_series(name, series, side, false),
            goals_series("Opponents", series, side, true),
        ],
    }
}

fn total_score_bars(store: &MatchStore, context: &MatchContext) -> Vec<TotalScoreBar> {
    let groups = [
        ("H2H", Collection::H2h, store.head_to_head()),
        ("T1", Collection::Team1, store.team_series(TeamSide::Team1)),
        ("T2", Collection::Team2, store.team_series(TeamSide::Team2)),
    ];

    groups
        .iter()
        .flat_map(|(prefix, category, matches)| {
            matches.iter().enumerate().map(move |(i, m)| TotalScoreBar {
                label: format!("{} {}", prefix, i + 1),
                total: m.total_score(),
                category: *category,
                over_line: context
                    .has_total_line()
                    .then(|| m.total_score() as f64 > context.total_line),
            })
        })
        .collect()
}

impl LineChart {
    fn rows(&self, chart: &str) -> Vec<ChartRow> {
        self.series
            .iter()
            .flat_map(|s| {
                s.values.iter().zip(&self.labels).map(move |(value, label)| ChartRow {
                    chart: chart.to_string(),
                    label: label.clone(),
                    series: s.name.clone(),
                    value: *value,
                })
            })
            .collect()
    }
}

impl ChartData {
    /// Every data point as a flat row, chart by chart.
    pub fn rows(&self) -> Vec<ChartRow> {
        let mut rows = Vec::new();
        rows.extend(self.head_to_head.rows("head_to_head"));
        rows.extend(self.team1.rows("team1"));
        rows.extend(self.team2.rows("team2"));
        rows.extend(self.totals.iter().map(|bar| ChartRow {
            chart: "totals".to_string(),
            label: bar.label.clone(),
            series: "Total Goals".to_string(),
            value: bar.total as f64,
        }));
        rows.extend(self.performance.rows("performance"));
        rows.extend(self.probabilities.iter().map(|slice| ChartRow {
            chart: "probabilities".to_string(),
            label: slice.label.clone(),
            series: "Probability".to_string(),
            value: slice.value,
        }));
        rows
    }
}
