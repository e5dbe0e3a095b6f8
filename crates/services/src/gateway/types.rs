//! Canonical request and response shapes at the backend boundary.
//!
//! Everything downstream of the gateway consumes these types; the wire
//! format and its aliases stay inside `gateway::wire`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use study_core::model::{
    AnswerSheet, AttemptMode, AttemptRecord, MaterialId, QuizQuestion, QuizStatsSnapshot, UserId,
};

// ─── Upload ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadSource {
    Pdf { file_name: String, bytes: Vec<u8> },
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    pub source: UploadSource,
    pub user_id: Option<UserId>,
    pub topic: Option<String>,
}

// ─── Videos ────────────────────────────────────────────────────────────────────

pub const DEFAULT_MAX_VIDEOS: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoQuery {
    pub key_topics: Vec<String>,
    pub key_points: Vec<String>,
    pub query: Option<String>,
    pub max_results: usize,
}

impl VideoQuery {
    #[must_use]
    pub fn for_topics(key_topics: Vec<String>, key_points: Vec<String>) -> Self {
        Self {
            key_topics,
            key_points,
            query: None,
            max_results: DEFAULT_MAX_VIDEOS,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail: Option<String>,
    pub published_at: Option<String>,
    pub description: String,
    pub duration_secs: u32,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
}

impl Video {
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

// ─── Mind map ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MindmapRequest {
    pub summary: String,
    pub key_topics: Vec<String>,
    pub key_points: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MindmapStructure {
    pub root: String,
    pub topics: Vec<String>,
    pub points_by_topic: BTreeMap<String, Vec<String>>,
}

/// A rendered mind map image plus the tree it was drawn from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mindmap {
    pub topic: String,
    pub image_base64: String,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub structure: MindmapStructure,
}

impl Mindmap {
    /// `data:` URI usable as an `img` source.
    #[must_use]
    pub fn data_uri(&self) -> Option<String> {
        if self.image_base64.is_empty() {
            return None;
        }
        let mime = if self.mime.is_empty() { "image/png" } else { &self.mime };
        Some(format!("data:{mime};base64,{}", self.image_base64))
    }
}

// ─── Mock test ─────────────────────────────────────────────────────────────────

/// `count` questions worth `marks` each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkPattern {
    pub marks: u32,
    pub count: u32,
}

impl MarkPattern {
    /// Paper layout used when the user does not pick one.
    #[must_use]
    pub fn default_paper() -> Vec<MarkPattern> {
        [(10, 3), (5, 4), (3, 10), (2, 5), (1, 10)]
            .into_iter()
            .map(|(marks, count)| MarkPattern { marks, count })
            .collect()
    }

    #[must_use]
    pub fn total_marks(patterns: &[MarkPattern]) -> u32 {
        patterns
            .iter()
            .map(|p| p.marks.saturating_mul(p.count))
            .fold(0, u32::saturating_add)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockTestRequest {
    pub text: String,
    pub topic: Option<String>,
    pub summary: String,
    pub key_points: Vec<String>,
    pub pattern: Vec<MarkPattern>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockQuestion {
    pub question: String,
    pub marks: u32,
    pub answer: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockTest {
    pub title: String,
    pub total_marks: u32,
    pub total_questions: u32,
    pub questions: Vec<MockQuestion>,
}

// ─── Quiz performance ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizSubmission {
    pub user_id: UserId,
    pub material_id: MaterialId,
    pub answers: AnswerSheet,
    pub mode: AttemptMode,
}

/// What the backend recorded for a submission.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionReceipt {
    pub attempt: AttemptRecord,
    pub stats: QuizStatsSnapshot,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevisionQuiz {
    pub questions: Vec<QuizQuestion>,
    /// Index of each revision question in the material's full quiz.
    pub indices: Vec<usize>,
    pub stats: QuizStatsSnapshot,
}

// ─── Dashboards ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialOverview {
    pub material_id: MaterialId,
    pub total_attempts: u32,
    pub avg_accuracy_pct: f64,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardOverview {
    pub materials: Vec<MaterialOverview>,
    pub total_attempts: u32,
    pub total_materials: u32,
    pub avg_accuracy_pct: f64,
}

/// Server-computed headline numbers for a user. Percent fields are 0..=100.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserSummary {
    pub total_attempts: u32,
    pub distinct_materials: u32,
    pub overall_accuracy_pct: f64,
    pub avg_score: f64,
    pub avg_accuracy_pct: f64,
    pub best_score: f64,
    pub best_accuracy_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub attempts: u32,
    pub avg_score: f64,
    pub avg_accuracy_pct: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserDashboard {
    pub summary: UserSummary,
    /// Chronological, oldest first.
    pub attempts: Vec<AttemptRecord>,
    pub by_date: Vec<DailyActivity>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDashboard {
    pub material_id: MaterialId,
    pub topic: Option<String>,
    pub source_name: Option<String>,
    pub stats: QuizStatsSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paper_totals() {
        let paper = MarkPattern::default_paper();
        assert_eq!(paper.len(), 5);
        assert_eq!(MarkPattern::total_marks(&paper), 30 + 20 + 30 + 10 + 10);
    }

    #[test]
    fn mindmap_data_uri_defaults_mime() {
        let mut map = Mindmap {
            image_base64: "AAAA".into(),
            ..Mindmap::default()
        };
        assert_eq!(map.data_uri().as_deref(), Some("data:image/png;base64,AAAA"));
        map.image_base64.clear();
        assert_eq!(map.data_uri(), None);
    }

    #[test]
    fn watch_url_uses_video_id() {
        let video = Video {
            video_id: "abc123".into(),
            ..Video::default()
        };
        assert_eq!(video.watch_url(), "https://www.youtube.com/watch?v=abc123");
    }
}
