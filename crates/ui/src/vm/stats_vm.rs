use study_core::analytics::{
    AttemptTrendPoint, DailyTrendPoint, DonutBreakdown, OverallStats, WeakQuestion,
};

use crate::vm::format::{
    OUTCOME_COLORS, format_score, height_style, palette_color, percent_detail, percent_headline,
    share_width, width_style,
};
use crate::vm::time_fmt::{format_datetime, format_day};

// ─── Overall cards ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatCardVm {
    pub label: &'static str,
    pub value: String,
    pub detail: Option<String>,
}

impl StatCardVm {
    fn new(label: &'static str, value: String, detail: Option<String>) -> Self {
        Self {
            label,
            value,
            detail,
        }
    }
}

/// Headline tiles for an attempt history.
#[must_use]
pub fn map_overall_cards(overall: &OverallStats) -> Vec<StatCardVm> {
    let best = if overall.best_base == 0 {
        "-".to_string()
    } else {
        format!("{}/{}", overall.best_score, overall.best_base)
    };
    let best_detail = (overall.best_base > 0).then(|| percent_detail(overall.best_accuracy()));

    vec![
        StatCardVm::new(
            "Attempts",
            overall.total_attempts.to_string(),
            (overall.scored_attempts != overall.total_attempts)
                .then(|| format!("{} with answers", overall.scored_attempts)),
        ),
        StatCardVm::new(
            "Average accuracy",
            percent_headline(overall.avg_accuracy),
            Some(format!("{} correct on average", format_score(overall.avg_score))),
        ),
        StatCardVm::new("Best attempt", best, best_detail),
        StatCardVm::new(
            "Overall accuracy",
            percent_headline(overall.overall_accuracy()),
            Some(format!(
                "{} of {} answered correctly",
                overall.total_correct, overall.total_attempted
            )),
        ),
    ]
}

// ─── Donut ─────────────────────────────────────────────────────────────────────

/// The donut is drawn with `r = 15.915`, so its circumference is 100 and
/// dash lengths are plain percentages.
pub const DONUT_RADIUS: &str = "15.915";

#[derive(Clone, Debug, PartialEq)]
pub struct DonutSegmentVm {
    pub label: &'static str,
    pub count: u32,
    pub percent_str: String,
    pub color: &'static str,
    pub dash_array: String,
    pub dash_offset: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DonutVm {
    pub segments: Vec<DonutSegmentVm>,
    pub center_label: String,
    pub caption: String,
}

impl DonutVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Segments for one attempt's outcome split. A zero base yields no segments.
#[must_use]
pub fn map_donut(breakdown: Option<&DonutBreakdown>) -> DonutVm {
    let Some(breakdown) = breakdown.filter(|b| !b.is_empty()) else {
        return DonutVm {
            segments: Vec::new(),
            center_label: "-".to_string(),
            caption: "No answers recorded yet".to_string(),
        };
    };

    let base = f64::from(breakdown.base);
    let parts = [
        ("Correct", breakdown.correct),
        ("Wrong", breakdown.wrong),
        ("Skipped", breakdown.skipped),
    ];

    let mut start = 0.0;
    let mut segments = Vec::with_capacity(parts.len());
    for ((label, count), color) in parts.into_iter().zip(OUTCOME_COLORS) {
        let share = share_width(f64::from(count), base);
        if count > 0 {
            segments.push(DonutSegmentVm {
                label,
                count,
                percent_str: percent_detail(share / 100.0),
                color,
                dash_array: format!("{share:.2} {:.2}", 100.0 - share),
                // Start at 12 o'clock and run clockwise.
                dash_offset: format!("{:.2}", 25.0 - start),
            });
        }
        start += share;
    }

    DonutVm {
        segments,
        center_label: percent_headline(f64::from(breakdown.correct) / base),
        caption: format!("{} questions", breakdown.base),
    }
}

// ─── Weak questions ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct WeakQuestionRowVm {
    pub index: usize,
    pub number_label: String,
    pub question: String,
    pub accuracy_str: String,
    pub bar_style: String,
    pub color: &'static str,
    pub counts_str: String,
}

impl WeakQuestionRowVm {
    fn new(rank: usize, weak: &WeakQuestion) -> Self {
        let counts = if weak.skipped > 0 {
            format!(
                "{}/{} correct, {} skipped",
                weak.correct, weak.attempts, weak.skipped
            )
        } else {
            format!("{}/{} correct", weak.correct, weak.attempts)
        };
        Self {
            index: weak.index,
            number_label: format!("Q{}", weak.index + 1),
            question: weak.question_text.clone(),
            accuracy_str: percent_detail(weak.accuracy),
            bar_style: width_style(weak.accuracy * 100.0),
            color: palette_color(rank),
            counts_str: counts,
        }
    }
}

#[must_use]
pub fn map_weak_questions(weakest: &[WeakQuestion]) -> Vec<WeakQuestionRowVm> {
    weakest
        .iter()
        .enumerate()
        .map(|(rank, weak)| WeakQuestionRowVm::new(rank, weak))
        .collect()
}

// ─── Trends ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrendBarVm {
    pub label: String,
    pub value_str: String,
    pub bar_style: String,
    pub color: &'static str,
    pub tooltip: String,
}

/// One bar per day, height = average accuracy.
#[must_use]
pub fn map_daily_trend(points: &[DailyTrendPoint]) -> Vec<TrendBarVm> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| TrendBarVm {
            label: format_day(point.date),
            value_str: percent_headline(point.avg_accuracy),
            bar_style: height_style(point.avg_accuracy * 100.0),
            color: palette_color(i),
            tooltip: format!(
                "{} attempt(s), {} correct on average",
                point.attempts_count,
                format_score(point.avg_score)
            ),
        })
        .collect()
}

/// One bar per attempt, height = accuracy of that attempt.
#[must_use]
pub fn map_attempt_trend(points: &[AttemptTrendPoint]) -> Vec<TrendBarVm> {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| TrendBarVm {
            label: format!("#{}", point.attempt_number),
            value_str: percent_headline(point.accuracy),
            bar_style: height_style(point.accuracy * 100.0),
            color: palette_color(i),
            tooltip: format!(
                "{}/{} on {}",
                point.correct,
                point.attempted,
                format_datetime(point.created_at)
            ),
        })
        .collect()
}

// ─── Revision ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevisionBannerVm {
    pub count: usize,
    pub message: String,
}

/// Prompt to start a revision quiz, if any question qualifies.
#[must_use]
pub fn map_revision_banner(revision_indices: &[usize]) -> Option<RevisionBannerVm> {
    let count = revision_indices.len();
    if count == 0 {
        return None;
    }
    let noun = if count == 1 { "question needs" } else { "questions need" };
    Some(RevisionBannerVm {
        count,
        message: format!("{count} {noun} another look"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use study_core::time::fixed_now;

    #[test]
    fn empty_donut_has_no_segments() {
        let vm = map_donut(Some(&DonutBreakdown::default()));
        assert!(vm.is_empty());
        assert_eq!(vm.center_label, "-");
        assert!(map_donut(None).is_empty());
    }

    #[test]
    fn donut_segments_follow_each_other() {
        let vm = map_donut(Some(&DonutBreakdown {
            correct: 2,
            wrong: 1,
            skipped: 1,
            base: 4,
        }));
        assert_eq!(vm.center_label, "50%");
        let arrays: Vec<&str> = vm.segments.iter().map(|s| s.dash_array.as_str()).collect();
        assert_eq!(arrays, vec!["50.00 50.00", "25.00 75.00", "25.00 75.00"]);
        let offsets: Vec<&str> = vm.segments.iter().map(|s| s.dash_offset.as_str()).collect();
        assert_eq!(offsets, vec!["25.00", "-25.00", "-50.00"]);
        assert_eq!(vm.segments[1].percent_str, "25.0%");
    }

    #[test]
    fn donut_skips_zero_segments() {
        let vm = map_donut(Some(&DonutBreakdown {
            correct: 3,
            wrong: 0,
            skipped: 0,
            base: 3,
        }));
        assert_eq!(vm.segments.len(), 1);
        assert_eq!(vm.center_label, "100%");
    }

    #[test]
    fn overall_cards_format_numbers() {
        let overall = OverallStats {
            total_attempts: 3,
            scored_attempts: 2,
            avg_score: 2.5,
            avg_accuracy: 0.888_9,
            best_score: 3,
            best_base: 3,
            total_correct: 5,
            total_attempted: 6,
            last_attempt: None,
        };
        let cards = map_overall_cards(&overall);
        assert_eq!(cards[0].detail.as_deref(), Some("2 with answers"));
        assert_eq!(cards[1].value, "89%");
        assert_eq!(cards[2].value, "3/3");
        assert_eq!(cards[2].detail.as_deref(), Some("100.0%"));
        assert_eq!(cards[3].value, "83%");
    }

    #[test]
    fn no_attempts_render_placeholders() {
        let cards = map_overall_cards(&OverallStats::default());
        assert_eq!(cards[0].value, "0");
        assert_eq!(cards[0].detail, None);
        assert_eq!(cards[1].value, "0%");
        assert_eq!(cards[2].value, "-");
    }

    #[test]
    fn weak_rows_are_numbered_from_one() {
        let rows = map_weak_questions(&[WeakQuestion {
            index: 2,
            attempts: 3,
            correct: 1,
            skipped: 1,
            wrong: 1,
            accuracy: 0.5,
            question_text: "Q3".into(),
        }]);
        assert_eq!(rows[0].number_label, "Q3");
        assert_eq!(rows[0].accuracy_str, "50.0%");
        assert_eq!(rows[0].bar_style, "width: 50.0%");
        assert_eq!(rows[0].counts_str, "1/3 correct, 1 skipped");
    }

    #[test]
    fn trend_bars_clamp_heights() {
        let daily = map_daily_trend(&[DailyTrendPoint {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            attempts_count: 2,
            avg_score: 1.5,
            avg_accuracy: 1.4,
        }]);
        assert_eq!(daily[0].label, "Mar 01");
        assert_eq!(daily[0].bar_style, "height: 100.0%");

        let attempts = map_attempt_trend(&[AttemptTrendPoint {
            attempt_number: 4,
            created_at: fixed_now(),
            correct: 1,
            attempted: 4,
            accuracy: 0.25,
        }]);
        assert_eq!(attempts[0].label, "#4");
        assert_eq!(attempts[0].value_str, "25%");
        assert_eq!(attempts[0].tooltip, "1/4 on 2023-11-14 22:13");
    }

    #[test]
    fn revision_banner_only_when_needed() {
        assert_eq!(map_revision_banner(&[]), None);
        let banner = map_revision_banner(&[1]).unwrap();
        assert_eq!(banner.message, "1 question needs another look");
        assert_eq!(map_revision_banner(&[1, 4]).unwrap().count, 2);
    }
}
