use services::gateway::{DashboardOverview, MaterialOverview};
use services::{MaterialReport, UserReport};
use study_core::model::MaterialId;

use crate::vm::format::{palette_color, percent_detail, percent_headline, width_style};
use crate::vm::stats_vm::{
    DonutVm, RevisionBannerVm, StatCardVm, TrendBarVm, WeakQuestionRowVm, map_attempt_trend,
    map_daily_trend, map_donut, map_overall_cards, map_revision_banner, map_weak_questions,
};
use crate::vm::time_fmt::format_datetime;

// ─── Overview ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialOverviewRowVm {
    pub material_id: MaterialId,
    pub label: String,
    pub attempts_str: String,
    pub accuracy_str: String,
    pub bar_style: String,
    pub color: &'static str,
    pub last_attempt_str: String,
}

impl MaterialOverviewRowVm {
    fn new(position: usize, item: &MaterialOverview) -> Self {
        Self {
            material_id: item.material_id.clone(),
            label: item.material_id.to_string(),
            attempts_str: match item.total_attempts {
                1 => "1 attempt".to_string(),
                n => format!("{n} attempts"),
            },
            accuracy_str: percent_headline(item.avg_accuracy_pct / 100.0),
            bar_style: width_style(item.avg_accuracy_pct),
            color: palette_color(position),
            last_attempt_str: item
                .last_attempt_at
                .map_or_else(|| "never".to_string(), format_datetime),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverviewVm {
    pub cards: Vec<StatCardVm>,
    pub rows: Vec<MaterialOverviewRowVm>,
}

impl From<&DashboardOverview> for OverviewVm {
    fn from(overview: &DashboardOverview) -> Self {
        let cards = vec![
            StatCardVm {
                label: "Materials practised",
                value: overview.total_materials.to_string(),
                detail: None,
            },
            StatCardVm {
                label: "Quiz attempts",
                value: overview.total_attempts.to_string(),
                detail: None,
            },
            StatCardVm {
                label: "Average accuracy",
                value: percent_headline(overview.avg_accuracy_pct / 100.0),
                detail: Some(percent_detail(overview.avg_accuracy_pct / 100.0)),
            },
        ];
        Self {
            cards,
            rows: overview
                .materials
                .iter()
                .enumerate()
                .map(|(i, item)| MaterialOverviewRowVm::new(i, item))
                .collect(),
        }
    }
}

// ─── User dashboard ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct UserDashboardVm {
    pub cards: Vec<StatCardVm>,
    pub last_donut: DonutVm,
    pub daily: Vec<TrendBarVm>,
    pub attempts: Vec<TrendBarVm>,
}

impl UserDashboardVm {
    #[must_use]
    pub fn has_attempts(&self) -> bool {
        !self.attempts.is_empty()
    }
}

impl From<&UserReport> for UserDashboardVm {
    fn from(report: &UserReport) -> Self {
        let mut cards = map_overall_cards(&report.overall);
        cards.push(StatCardVm {
            label: "Materials",
            value: report.dashboard.summary.distinct_materials.to_string(),
            detail: None,
        });
        let last = report
            .overall
            .last_attempt
            .as_ref()
            .map(study_core::analytics::compute_donut_breakdown);
        Self {
            cards,
            last_donut: map_donut(last.as_ref()),
            daily: map_daily_trend(&report.daily),
            attempts: map_attempt_trend(&report.attempts),
        }
    }
}

// ─── Material stats ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialStatsVm {
    pub title: String,
    pub cards: Vec<StatCardVm>,
    pub last_donut: DonutVm,
    pub weakest: Vec<WeakQuestionRowVm>,
    pub attempts: Vec<TrendBarVm>,
    pub daily: Vec<TrendBarVm>,
    pub revision: Option<RevisionBannerVm>,
    pub has_attempts: bool,
}

impl From<&MaterialReport> for MaterialStatsVm {
    fn from(material: &MaterialReport) -> Self {
        let report = &material.report;
        Self {
            title: material.title(),
            cards: map_overall_cards(&report.overall),
            last_donut: map_donut(report.last_breakdown.as_ref()),
            weakest: map_weak_questions(&report.weakest),
            attempts: map_attempt_trend(&report.attempts),
            daily: map_daily_trend(&report.daily),
            revision: map_revision_banner(&report.revision_indices),
            has_attempts: report.has_attempts(),
        }
    }
}
