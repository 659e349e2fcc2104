use std::io::IsTerminal;
use chrono::{Duration, Utc};
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use super::numbers::{format_number_for_display, to_fixed};
use crate::initiative::ReachInput;
use crate::scoring::{PortfolioTotals, RankedInitiative};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a RICE score with one decimal. The zero-effort sentinel shows as "∞".
pub fn format_score(score: f64) -> String {
    if score.is_infinite() && score > 0.0 {
        "∞".to_string()
    } else {
        to_fixed(score, 1)
    }
}

/// Format an amount of money with the currency symbol and `k` notation
pub fn format_money(currency: &str, amount: f64) -> String {
    format!("{}{}", currency, format_number_for_display(amount))
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

const EMPTY_MESSAGE: &str = "No initiatives yet. Add your first RICE entry to get started!";

// Column widths: index, score, reach, impact, confidence, weeks
const INDEX_WIDTH: usize = 3;
const SCORE_WIDTH: usize = 8;
const REACH_WIDTH: usize = 8;
const IMPACT_WIDTH: usize = 6;
const CONFIDENCE_WIDTH: usize = 5;
const WEEKS_WIDTH: usize = 6;
const SEPARATOR: &str = "  ";

fn fixed_columns_width() -> usize {
    INDEX_WIDTH
        + 1
        + SCORE_WIDTH
        + REACH_WIDTH
        + IMPACT_WIDTH
        + CONFIDENCE_WIDTH
        + WEEKS_WIDTH
        + SEPARATOR.len() * 5
}

fn fit_title(title: &str, term_width: Option<usize>) -> String {
    let fixed_width = fixed_columns_width();
    match term_width {
        Some(width) if width > fixed_width + 10 => truncate_title(title, width - fixed_width),
        // Very narrow terminal, show truncated
        Some(_) => truncate_title(title, 20),
        // No terminal (pipe), don't truncate
        None => title.to_string(),
    }
}

fn table_row(
    index: &str,
    score: &str,
    reach: &str,
    impact: &str,
    confidence: &str,
    weeks: &str,
) -> String {
    format!(
        "{:>iw$} {:>sw$}{sep}{:>rw$}{sep}{:>mw$}{sep}{:>cw$}{sep}{:>ww$}{sep}",
        index,
        score,
        reach,
        impact,
        confidence,
        weeks,
        iw = INDEX_WIDTH,
        sw = SCORE_WIDTH,
        rw = REACH_WIDTH,
        mw = IMPACT_WIDTH,
        cw = CONFIDENCE_WIDTH,
        ww = WEEKS_WIDTH,
        sep = SEPARATOR,
    )
}

/// Format the ranking as a table: rank, score, reach/yr, impact, confidence,
/// effort in weeks and title, followed by portfolio totals and ARR uplift.
pub fn format_ranked_table(
    ranked: &[RankedInitiative<'_>],
    totals: &PortfolioTotals,
    arpu: f64,
    currency: &str,
    use_colors: bool,
) -> String {
    if ranked.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let term_width = get_terminal_width();
    let mut lines = Vec::with_capacity(ranked.len() + 4);

    let header = format!(
        "{}Initiative",
        table_row("#", "Score", "Reach/yr", "Impact", "Conf", "Weeks")
    );
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (idx, entry) in ranked.iter().enumerate() {
        let scores = &entry.scores;
        let row = table_row(
            &format!("{}.", idx + 1),
            &format_score(scores.rice_score),
            &format_number_for_display(scores.reach),
            &to_fixed(scores.impact, 1),
            &format!("{}%", to_fixed(scores.confidence, 0)),
            &to_fixed(scores.effort_weeks(), 1),
        );
        let title = fit_title(&entry.initiative.title, term_width);

        if use_colors {
            lines.push(format!("{}{}", row, title.bold()));
        } else {
            lines.push(format!("{}{}", row, title));
        }
    }

    let totals_line = format!(
        "TOTALS (12-month portfolio): {} customers, {} months of effort",
        format_number_for_display(totals.reach),
        to_fixed(totals.effort_months, 1)
    );
    let arr_line = format!(
        "ARR uplift: {} = {}{} ARPU × 12 months × {} customers",
        format_money(currency, totals.arr_uplift),
        currency,
        to_fixed(arpu, 2),
        format_number_for_display(totals.reach)
    );

    lines.push(String::new());
    if use_colors {
        lines.push(totals_line.cyan().to_string());
        lines.push(arr_line.green().to_string());
    } else {
        lines.push(totals_line);
        lines.push(arr_line);
    }

    lines.join("\n")
}

fn push_context(lines: &mut Vec<String>, context: Option<&str>) {
    if let Some(context) = context {
        lines.push(format!("    Context: {}", context));
    }
}

/// Format one ranked initiative with every driver and derived number
pub fn format_initiative_detail(
    rank: usize,
    entry: &RankedInitiative<'_>,
    use_colors: bool,
) -> String {
    let initiative = entry.initiative;
    let scores = &entry.scores;
    let mut lines = Vec::new();

    let heading = format!("#{} {}", rank, initiative.title);
    lines.push(if use_colors {
        heading.bold().to_string()
    } else {
        heading
    });
    lines.push(format!(
        "  Id: {}  Updated {} ago",
        initiative.short_id(),
        format_age(Utc::now() - initiative.updated_at)
    ));

    let score_line = format!("  RICE score: {}", format_score(scores.rice_score));
    lines.push(if use_colors {
        score_line.green().to_string()
    } else {
        score_line
    });

    lines.push(format!(
        "  Reach: {} /yr ({} mode)",
        format_number_for_display(scores.reach),
        initiative.reach.mode_name()
    ));
    match &initiative.reach {
        ReachInput::Optimise(r) => {
            lines.push(format!(
                "    Eligible today: {}  Monthly growth: {}",
                format_number_for_display(r.eligible_today),
                format_number_for_display(r.monthly_growth)
            ));
            lines.push(format!(
                "    Adoption: {}% -> {}%",
                r.current_adoption_percentage, r.adoption_rate_percentage
            ));
        }
        ReachInput::Acquire(r) => {
            lines.push(format!(
                "    Monthly new eligible (SOM): {}  Adoption: {}%",
                format_number_for_display(r.monthly_new_eligible),
                r.adoption_rate_percentage
            ));
        }
    }
    push_context(&mut lines, initiative.reach.context());

    let impact = &initiative.impact_drivers;
    lines.push(format!("  Impact: {}", to_fixed(scores.impact, 1)));
    lines.push(format!(
        "    User value: {}  Business value: {}  Strategic fit: {}",
        impact.user_value, impact.business_value, impact.strategic_fit
    ));
    push_context(&mut lines, impact.context.as_deref());

    let confidence = &initiative.confidence_drivers;
    lines.push(format!("  Confidence: {}%", to_fixed(scores.confidence, 0)));
    lines.push(format!(
        "    Data quality: {}%  Precedent: {}%  Delivery: {}%",
        confidence.data_quality, confidence.precedent_similarity, confidence.delivery_confidence
    ));
    push_context(&mut lines, confidence.context.as_deref());

    let effort = &initiative.effort;
    lines.push(format!(
        "  Effort: {} weeks ({} hours)",
        to_fixed(scores.effort_weeks(), 1),
        scores.effort_hours
    ));
    lines.push(format!(
        "    Frontend: {}h  Backend: {}h  Design: {}h  PM: {}h",
        effort.frontend, effort.backend, effort.design, effort.pm
    ));
    push_context(&mut lines, effort.context.as_deref());

    lines.join("\n")
}

/// Format the ranking as tab-separated values for scripting
/// Columns: rank, score, reach, impact, confidence, effort_hours, id, title (no headers, no colors)
pub fn format_tsv(ranked: &[RankedInitiative<'_>]) -> String {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let scores = &entry.scores;
            format!(
                "{}\t{:.3}\t{}\t{:.3}\t{:.3}\t{}\t{}\t{}",
                idx + 1,
                scores.rice_score,
                scores.reach,
                scores.impact,
                scores.confidence,
                scores.effort_hours,
                entry.initiative.id,
                entry.initiative.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initiative::{AcquireReach, ConfidenceInput, EffortInput, ImpactInput, Initiative};
    use crate::scoring::rank;

    fn sample_initiative(title: &str, monthly_new: f64) -> Initiative {
        Initiative::new(
            title,
            ReachInput::Acquire(AcquireReach {
                monthly_new_eligible: monthly_new,
                adoption_rate_percentage: 50.0,
                context: Some("new channel".to_string()),
            }),
            ImpactInput::default(),
            ConfidenceInput::default(),
            EffortInput {
                frontend: 40.0,
                backend: 40.0,
                design: 0.0,
                pm: 0.0,
                context: None,
            },
        )
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(1171.875), "1171.9");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(12.25), "12.3");
        assert_eq!(format_score(f64::INFINITY), "∞");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("£", 302_400.0), "£302.4k");
        assert_eq!(format_money("$", 120.0), "$120");
        assert_eq!(format_money("£", 12_250.0), "£12.3k");
    }

    #[test]
    fn test_truncate_title_long() {
        assert_eq!(truncate_title("This is a very long title", 15), "This is a ve...");
    }

    #[test]
    fn test_truncate_title_very_narrow() {
        assert_eq!(truncate_title("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_age_days() {
        assert_eq!(format_age(Duration::days(2)), "2d");
        assert_eq!(format_age(Duration::weeks(2)), "2w");
        assert_eq!(format_age(Duration::seconds(30)), "now");
    }

    #[test]
    fn test_ranked_table_empty() {
        let totals = PortfolioTotals::from_ranked(&[], 14.0);
        let result = format_ranked_table(&[], &totals, 14.0, "£", false);
        assert_eq!(result, EMPTY_MESSAGE);
    }

    #[test]
    fn test_ranked_table_rows_and_totals() {
        let entries = vec![sample_initiative("Small", 100.0), sample_initiative("Big", 1000.0)];
        let ranked = rank(&entries);
        let totals = PortfolioTotals::from_ranked(&ranked, 14.0);
        let result = format_ranked_table(&ranked, &totals, 14.0, "£", false);
        let lines: Vec<&str> = result.lines().collect();

        assert!(lines[0].contains("Score"));
        assert!(lines[1].contains(" 1."));
        assert!(lines[1].contains("Big"));
        assert!(lines[1].contains("6k"));
        assert!(lines[2].contains(" 2."));
        assert!(lines[2].contains("Small"));
        assert!(lines[2].contains("50%"));
        assert!(lines[2].contains("2.0"));
        // 6000 + 600 customers; 14 × 12 × 6600 = 1,108,800
        assert!(result.contains("TOTALS (12-month portfolio): 6.6k customers"));
        assert!(result.contains("ARR uplift: £1108.8k = £14.00 ARPU"));
    }

    #[test]
    fn test_initiative_detail() {
        let entries = vec![sample_initiative("Referral program", 500.0)];
        let ranked = rank(&entries);
        let result = format_initiative_detail(1, &ranked[0], false);

        assert!(result.starts_with("#1 Referral program"));
        assert!(result.contains("Reach: 3k /yr (acquire mode)"));
        assert!(result.contains("Context: new channel"));
        assert!(result.contains("Impact: 1.8"));
        assert!(result.contains("Confidence: 50%"));
        assert!(result.contains("Effort: 2.0 weeks (80 hours)"));
    }

    #[test]
    fn test_format_tsv() {
        let entries = vec![sample_initiative("Referral program", 500.0)];
        let ranked = rank(&entries);
        let result = format_tsv(&ranked);
        let fields: Vec<&str> = result.split('\t').collect();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0], "1");
        assert_eq!(fields[2], "3000");
        assert_eq!(fields[7], "Referral program");
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }
}
