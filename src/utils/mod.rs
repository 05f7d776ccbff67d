use statrs::statistics::Statistics;

use crate::error::{AnalysisError, Result};

/// Highest score a single side may post in one match.
pub const MAX_SCORE: u32 = 999;

/// Range-check one raw score.
pub fn checked_score(value: i64) -> Result<u32> {
    if value < 0 {
        return Err(AnalysisError::NegativeScore(value));
    }
    if value > i64::from(MAX_SCORE) {
        return Err(AnalysisError::ScoreTooHigh { value, max: MAX_SCORE });
    }
    Ok(value as u32)
}

/// Parse a comma-separated score list such as "2, 1,3".
pub fn parse_scores(input: &str) -> Result<Vec<u32>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyScores);
    }

    trimmed
        .split(',')
        .map(|token| {
            let token = token.trim();
            let value: i64 = token
                .parse()
                .map_err(|_| AnalysisError::InvalidScore(token.to_string()))?;
            checked_score(value)
        })
        .collect()
}

/// Arithmetic mean, or `default` for an empty sample.
pub fn mean_or(values: &[f64], default: f64) -> f64 {
    if values.is_empty() {
        return default;
    }
    Statistics::mean(values)
}

/// Trailing average over at most `window` values ending at each position.
/// The first entries use the shorter window available to them.
pub fn trailing_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean_or(&values[start..=i], 0.0)
        })
        .collect()
}

/// Normalize values so they sum to `scale`. An all-zero input is returned unchanged.
pub fn normalize_to(values: &[f64], scale: f64) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    if sum == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|v| v / sum * scale).collect()
}

/// Fraction of maximum league points (3 per match) earned from `points` over `matches`.
pub fn points_fraction(points: u32, matches: usize, default: f64) -> f64 {
    if matches == 0 {
        return default;
    }
    points as f64 / (matches as f64 * 3.0)
}

pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Human label for a match-importance multiplier.
pub fn importance_text(importance: f64) -> &'static str {
    if importance <= 0.8 {
        "Friendly Match"
    } else if importance <= 1.0 {
        "Regular Match"
    } else if importance <= 1.2 {
        "Tournament Match"
    } else if importance <= 1.5 {
        "Playoff Match"
    } else {
        "Championship/Final"
    }
}

/// "+0.5" / "-0.5" / "0".
pub fn format_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", value)
    } else {
        format!("{}", value)
    }
}

/// Team names are capped at 100 characters.
pub fn validate_team_name(name: &str) -> bool {
    name.chars().count() <= 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scores() {
        assert_eq!(parse_scores("2,1, 3 ,0").unwrap(), vec![2, 1, 3, 0]);
        assert_eq!(parse_scores("7").unwrap(), vec![7]);
        assert_eq!(parse_scores("   "), Err(AnalysisError::EmptyScores));
        assert_eq!(parse_scores("2,x"), Err(AnalysisError::InvalidScore("x".to_string())));
        assert_eq!(parse_scores("2,,1"), Err(AnalysisError::InvalidScore(String::new())));
        assert_eq!(parse_scores("1,-2"), Err(AnalysisError::NegativeScore(-2)));
        assert!(parse_scores("1.5").is_err());
    }

    #[test]
    fn test_parse_scores_rejects_huge_values() {
        assert_eq!(parse_scores("999").unwrap(), vec![999]);
        assert_eq!(
            parse_scores("2,1000"),
            Err(AnalysisError::ScoreTooHigh { value: 1000, max: MAX_SCORE })
        );
        assert_eq!(
            parse_scores("4294967295"),
            Err(AnalysisError::ScoreTooHigh { value: 4294967295, max: MAX_SCORE })
        );
        // beyond i64 is not a number at all
        assert!(matches!(
            parse_scores("99999999999999999999"),
            Err(AnalysisError::InvalidScore(_))
        ));
    }

    #[test]
    fn test_validate_team_name_counts_characters() {
        assert!(validate_team_name(&"é".repeat(100)));
        assert!(!validate_team_name(&"é".repeat(101)));
        assert!(validate_team_name(""));
    }

    #[test]
    fn test_mean_or() {
        assert_eq!(mean_or(&[], 2.5), 2.5);
        assert!((mean_or(&[1.0, 2.0, 4.0], 0.0) - 7.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_trailing_average() {
        let values = [60.0, 30.0, 90.0, 0.0];
        let smoothed = trailing_average(&values, 3);
        assert_eq!(smoothed.len(), 4);
        assert_eq!(smoothed[0], 60.0);
        assert_eq!(smoothed[1], 45.0);
        assert_eq!(smoothed[2], 60.0);
        assert_eq!(smoothed[3], 40.0);
        assert!(trailing_average(&[], 3).is_empty());
    }

    #[test]
    fn test_normalize_to() {
        let normalized = normalize_to(&[0.4, 0.3, 0.2], 100.0);
        let sum: f64 = normalized.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(normalize_to(&[0.0, 0.0], 100.0), vec![0.0, 0.0]);
    }

    #[test]
    fn test_points_fraction() {
        assert_eq!(points_fraction(10, 5, 0.5), 10.0 / 15.0);
        assert_eq!(points_fraction(0, 0, 0.5), 0.5);
    }

    #[test]
    fn test_importance_text() {
        assert_eq!(importance_text(0.5), "Friendly Match");
        assert_eq!(importance_text(1.0), "Regular Match");
        assert_eq!(importance_text(1.2), "Tournament Match");
        assert_eq!(importance_text(1.5), "Playoff Match");
        assert_eq!(importance_text(2.0), "Championship/Final");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(0.5), "+0.5");
        assert_eq!(format_signed(-0.5), "-0.5");
        assert_eq!(format_signed(1.0), "+1");
    }
}
