use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;
use crate::models::{Collection, Location, MatchContext, PredictedOutcome, TeamSide};
use crate::services::{AnalysisReport, ChartData, MatchAnalyzer};
use crate::store::{sample_data, MatchStore};
use crate::utils::parse_scores;

/// Match context and score lists as typed on the command line.
#[derive(Args, Debug, Clone)]
pub struct MatchInput {
    /// Team 1 name
    #[arg(long, default_value = "Team 1")]
    pub team1: String,
    /// Team 2 name
    #[arg(long, default_value = "Team 2")]
    pub team2: String,
    /// Venue from team 1's point of view: home, away or neutral
    #[arg(long, default_value = "neutral")]
    pub location: Location,
    /// Match importance (1.0 = regular match)
    #[arg(long, default_value_t = 1.0)]
    pub importance: f64,

    /// Head-to-head scores of team 1, comma separated
    #[arg(long)]
    pub h2h_team1: Option<String>,
    /// Head-to-head scores of team 2, comma separated
    #[arg(long)]
    pub h2h_team2: Option<String>,
    /// Team 1 scores against other opponents
    #[arg(long)]
    pub team1_scores: Option<String>,
    /// Opponent scores in team 1's matches
    #[arg(long)]
    pub team1_opponents: Option<String>,
    /// Team 2 scores against other opponents
    #[arg(long)]
    pub team2_scores: Option<String>,
    /// Opponent scores in team 2's matches
    #[arg(long)]
    pub team2_opponents: Option<String>,

    /// Over/under total line (0 = unset)
    #[arg(long, default_value_t = 0.0)]
    pub total_line: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub team1_handicap: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub team2_handicap: f64,
}

impl MatchInput {
    pub fn context(&self) -> Result<MatchContext, AnalysisError> {
        let context = MatchContext {
            location: self.location,
            importance: self.importance,
            total_line: self.total_line,
            team1_handicap: self.team1_handicap,
            team2_handicap: self.team2_handicap,
            ..MatchContext::new(&self.team1, &self.team2)
        };
        context.validate()?;
        Ok(context)
    }

    pub fn store(&self, context: &MatchContext) -> Result<MatchStore, AnalysisError> {
        let mut store = MatchStore::new();
        let batches = [
            (Collection::H2h, &self.h2h_team1, &self.h2h_team2),
            (Collection::Team1, &self.team1_scores, &self.team1_opponents),
            (Collection::Team2, &self.team2_scores, &self.team2_opponents),
        ];

        for (collection, left, right) in batches {
            let (left, right) = match (left, right) {
                (None, None) => continue,
                (Some(left), Some(right)) => (parse_scores(left)?, parse_scores(right)?),
                // Both sides of a batch are required
                _ => return Err(AnalysisError::EmptyScores),
            };
            let stored = store.set_collection(collection, &left, &right)?;
            let label = match collection {
                Collection::H2h => "H2H".to_string(),
                Collection::Team1 => context.team_name(TeamSide::Team1).to_string(),
                Collection::Team2 => context.team_name(TeamSide::Team2).to_string(),
            };
            println!("📥 Added {} matches for {}", stored, label);
        }

        Ok(store)
    }
}

/// Output switches shared by `analyze` and `sample`.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputOptions {
    /// Print the full report as JSON instead of text
    #[arg(long)]
    pub json: bool,
    /// Write every chart data point to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn analyze(input: &MatchInput, output: &OutputOptions) -> Result<()> {
    let context = input.context()?;
    let store = input.store(&context)?;
    run_analysis(&store, &context, output)
}

pub fn analyze_sample(output: &OutputOptions) -> Result<()> {
    let (store, context) = sample_data()?;
    println!(
        "🧪 Sample data loaded: {} vs {}",
        context.team1_name, context.team2_name
    );
    run_analysis(&store, &context, output)
}

fn run_analysis(store: &MatchStore, context: &MatchContext, output: &OutputOptions) -> Result<()> {
    let analyzer = MatchAnalyzer::new();

    let report = match analyzer.report(store, context) {
        Ok(report) => report,
        Err(AnalysisError::InsufficientData { have, need }) => {
            println!("❌ Please add at least {} total matches for analysis", need);
            println!("💡 Need {} more matches (currently {})", need - have, have);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    if let Some(path) = &output.csv {
        let rows = write_chart_csv(path, &report.charts)?;
        println!("💾 Wrote {} chart rows to {}", rows, path.display());
    }

    Ok(())
}

pub fn write_chart_csv(path: &Path, charts: &ChartData) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let rows = charts.rows();
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(rows.len())
}

/// Plain-text rendering of a report.
pub fn render_report(report: &AnalysisReport) -> String {
    let ctx = &report.context;
    let result = &report.result;
    let p = &result.probabilities;
    let mut out = String::new();

    out.push_str(&format!("\n🔮 {} vs {}\n\n", ctx.team1_name, ctx.team2_name));

    out.push_str("🎯 Most Likely Outcome\n");
    out.push_str(&format!(
        "   {} ({:.1}% probability)\n",
        report.outcome_label, report.outcome_probability
    ));
    out.push_str(&format!(
        "   {} Win: {:.1}% | Draw: {:.1}% | {} Win: {:.1}%\n\n",
        ctx.team1_name, p.team1_win, p.draw, ctx.team2_name, p.team2_win
    ));

    let score = &result.projected_score;
    out.push_str("⚽ Projected Final Score\n");
    out.push_str(&format!(
        "   {:.1} - {:.1} (Total Goals: {:.1})\n",
        score.team1_goals, score.team2_goals, score.total_goals
    ));
    if let Some(verdict) = &report.total_line {
        out.push_str(&format!(
            "   Total Line {}: {} ({:.1} goals {})\n",
            verdict.line,
            verdict.label(),
            verdict.margin,
            if verdict.over { "above" } else { "below" }
        ));
    }
    out.push('\n');

    out.push_str("📋 Key Match Factors\n");
    if result.key_factors.is_empty() {
        out.push_str("   No significant factors identified based on available data.\n");
    } else {
        for factor in &result.key_factors {
            out.push_str(&format!(
                "   • {} (impact {:.2})\n     {}\n",
                factor.title, factor.impact, factor.description
            ));
        }
    }
    out.push('\n');

    out.push_str("📊 Team Performance\n");
    for (name, stats) in [
        (&ctx.team1_name, &result.team1_stats),
        (&ctx.team2_name, &result.team2_stats),
    ] {
        out.push_str(&format!(
            "   {}: {:.1} goals/match, {:.1} conceded/match\n",
            name, stats.avg_goals_for, stats.avg_goals_against
        ));
    }
    out.push_str(&format!(
        "   Form: {} ({:.0}%), {} ({:.0}%)\n\n",
        ctx.team1_name,
        result.team1_stats.recent_form * 100.0,
        ctx.team2_name,
        result.team2_stats.recent_form * 100.0
    ));

    let h2h = &result.h2h_stats;
    out.push_str("🤝 Head-to-Head Record\n");
    if h2h.total_matches > 0 {
        out.push_str(&format!("   Total Matches: {}\n", h2h.total_matches));
        out.push_str(&format!("   {} Wins: {}\n", ctx.team1_name, h2h.team1_wins));
        out.push_str(&format!("   Draws: {}\n", h2h.draws));
        out.push_str(&format!("   {} Wins: {}\n", ctx.team2_name, h2h.team2_wins));
        out.push_str(&format!("   Avg. Goals/Match: {:.1}\n", h2h.avg_total_goals));
    } else {
        out.push_str("   No head-to-head data available\n");
    }
    out.push('\n');

    out.push_str("🏟️  Match Context\n");
    out.push_str(&format!("   Location: {}\n", report.venue));
    out.push_str(&format!("   Importance: {}\n", report.importance_label));
    if ctx.has_total_line() {
        out.push_str(&format!(
            "   Total Line: {} (Projection: {:.1})\n",
            ctx.total_line, score.total_goals
        ));
    }
    if let Some(handicap) = &report.handicap {
        out.push_str(&format!("   Handicap: {}\n", handicap));
    }
    out.push('\n');

    out.push_str("📈 Performance Index (last match)\n");
    for (name, series) in [
        (&ctx.team1_name, &report.team1_performance),
        (&ctx.team2_name, &report.team2_performance),
    ] {
        match series.last() {
            Some(value) => out.push_str(&format!(
                "   {}: {:.1} over {} matches\n",
                name,
                value,
                series.len()
            )),
            None => out.push_str(&format!("   {}: no matches\n", name)),
        }
    }

    if report.predicted_outcome == PredictedOutcome::Draw {
        out.push_str("\n⚖️  The model leans towards a draw.\n");
    }

    out
}
