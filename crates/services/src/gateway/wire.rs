//! JSON shapes spoken by the study backend and their conversion into the
//! canonical gateway types.
//!
//! The backend is loose about types (ids may be numbers or strings, counters
//! may arrive as floats, timestamps may lack an offset) and about presence
//! (any field may be missing). Every field here is defaulted and every
//! conversion is total.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use study_core::model::{
    AttemptMode, AttemptRecord, Flashcard, MaterialId, PerQuestionStat, QuizQuestion,
    QuizStatsSnapshot, SourceType, StudyMaterial, UnsolvedQuestion,
};

use crate::error::GatewayError;
use crate::gateway::types::{
    DailyActivity, DashboardOverview, MarkPattern, MaterialDashboard, MaterialOverview, Mindmap,
    MindmapStructure, MockQuestion, MockTest, RevisionQuiz, SubmissionReceipt, UserDashboard,
    UserSummary, Video,
};

// ─── Envelope handling ─────────────────────────────────────────────────────────

/// Message carried by an error body, if the body is one.
///
/// The backend reports failures either as `{"error": true, "message": ...}`
/// (sometimes with a 200 status) or as `{"error": "...", "details": ...}`.
pub(crate) fn backend_error(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty());
    let details = value
        .get("details")
        .and_then(Value::as_str)
        .filter(|d| !d.trim().is_empty());

    match error {
        Value::Bool(false) | Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(match details {
            Some(details) => format!("{text} ({details})"),
            None => text.clone(),
        }),
        _ => Some(
            message
                .or(details)
                .unwrap_or("the server could not process the request")
                .to_owned(),
        ),
    }
}

/// Parse a response body, turning error envelopes into `GatewayError::Backend`.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    let value: Value = if body.trim().is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(body)?
    };
    if let Some(message) = backend_error(&value) {
        return Err(GatewayError::Backend(message));
    }
    Ok(serde_json::from_value(unwrap_data_envelope(value))?)
}

/// Some deployments wrap the payload in `{"data": {...}}`.
fn unwrap_data_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.get("data").is_some_and(Value::is_object) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

// ─── Lenient scalars ───────────────────────────────────────────────────────────

fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn value_to_u64(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let n = value_to_f64(value)?;
    if n < 0.0 {
        return Some(0);
    }
    Some(n.round().min(u64::MAX as f64) as u64)
}

fn de_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .as_ref()
        .and_then(value_to_u64)
        .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX)))
}

fn de_opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(value_to_u64))
}

fn de_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(value_to_f64).unwrap_or(0.0))
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn de_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(value_to_string).unwrap_or_default())
}

fn de_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .as_ref()
        .and_then(value_to_string)
        .filter(|s| !s.trim().is_empty()))
}

fn de_string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(value_to_string)
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Objects that fail to decode are skipped; `null` or a non-array is empty.
fn de_object_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(d)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| {
            serde_json::from_value(item)
                .inspect_err(|err| warn!("skipping list element {position}: {err}"))
                .ok()
        })
        .collect())
}

fn de_object_map<'de, D, T>(d: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(d)?;
    let Some(Value::Object(entries)) = value else {
        return Ok(BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, item)| {
            serde_json::from_value(item)
                .inspect_err(|err| warn!("skipping entry {key:?}: {err}"))
                .ok()
                .map(|parsed| (key, parsed))
        })
        .collect())
}

fn de_index_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<usize>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .iter()
        .filter_map(value_to_u64)
        .filter_map(|n| usize::try_from(n).ok())
        .collect())
}

fn de_opt_datetime<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

/// RFC 3339 first, then naive ISO-8601 (read as UTC), then a bare date.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `PT#H#M#S` to seconds; anything else is 0.
pub(crate) fn parse_iso8601_duration(raw: &str) -> u32 {
    let Some(rest) = raw.trim().strip_prefix("PT") else {
        return 0;
    };
    let mut total = 0_u32;
    let mut digits = String::new();
    for ch in rest.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let Ok(amount) = digits.parse::<u32>() else {
            return 0;
        };
        digits.clear();
        let unit = match ch {
            'H' => 3600,
            'M' => 60,
            'S' => 1,
            _ => return 0,
        };
        total = total.saturating_add(amount.saturating_mul(unit));
    }
    if digits.is_empty() { total } else { 0 }
}

fn material_id_or_warn(raw: Option<String>) -> Option<MaterialId> {
    let raw = raw?;
    match MaterialId::new(raw.as_str()) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!("ignoring material id {raw:?}: {err}");
            None
        }
    }
}

// ─── Study material ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FlashcardDto {
    #[serde(alias = "question", deserialize_with = "de_string")]
    front: String,
    #[serde(alias = "answer", deserialize_with = "de_string")]
    back: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct QuizQuestionDto {
    #[serde(deserialize_with = "de_string")]
    question: String,
    #[serde(deserialize_with = "de_string_list")]
    options: Vec<String>,
    #[serde(alias = "correct_answer", deserialize_with = "de_string")]
    answer: String,
    #[serde(deserialize_with = "de_opt_string")]
    explanation: Option<String>,
}

impl From<QuizQuestionDto> for QuizQuestion {
    fn from(dto: QuizQuestionDto) -> Self {
        Self {
            question: dto.question,
            options: dto.options,
            answer: dto.answer,
            explanation: dto.explanation,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MaterialDto {
    #[serde(alias = "id", deserialize_with = "de_opt_string")]
    material_id: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    source_type: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    source_name: Option<String>,
    #[serde(alias = "summaryText", deserialize_with = "de_string")]
    summary: String,
    #[serde(alias = "keyTopics", deserialize_with = "de_string_list")]
    key_topics: Vec<String>,
    #[serde(alias = "keyPoints", deserialize_with = "de_string_list")]
    key_points: Vec<String>,
    #[serde(deserialize_with = "de_object_list")]
    flashcards: Vec<FlashcardDto>,
    #[serde(deserialize_with = "de_object_list")]
    quiz: Vec<QuizQuestionDto>,
}

impl From<MaterialDto> for StudyMaterial {
    fn from(dto: MaterialDto) -> Self {
        let source_type = match dto.source_type.as_deref() {
            Some("text") => SourceType::Text,
            _ => SourceType::Pdf,
        };
        Self {
            material_id: material_id_or_warn(dto.material_id),
            source_type,
            source_name: dto.source_name,
            summary: dto.summary.trim().to_owned(),
            key_topics: dto.key_topics,
            key_points: dto.key_points,
            flashcards: dto
                .flashcards
                .into_iter()
                .filter(|card| !card.front.trim().is_empty())
                .map(|card| Flashcard {
                    front: card.front,
                    back: card.back,
                })
                .collect(),
            quiz: dto
                .quiz
                .into_iter()
                .filter(|q| !q.question.trim().is_empty())
                .map(QuizQuestion::from)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AnswerDto {
    #[serde(deserialize_with = "de_string")]
    pub(crate) answer: String,
}

// ─── Attempts and quiz stats ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AttemptDto {
    #[serde(alias = "attempt_number", deserialize_with = "de_u32")]
    attempt_no: u32,
    #[serde(deserialize_with = "de_opt_string")]
    material_id: Option<String>,
    #[serde(deserialize_with = "de_opt_datetime")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "de_opt_string")]
    mode: Option<String>,
    #[serde(alias = "correct_answers", deserialize_with = "de_u32")]
    correct: u32,
    #[serde(alias = "wrong_answers", deserialize_with = "de_u32")]
    wrong: u32,
    #[serde(deserialize_with = "de_u32")]
    skipped: u32,
}

impl AttemptDto {
    /// `attempted` and `total_questions` are derived from the outcome
    /// counters; the backend's own `total_questions` is not consistent across
    /// endpoints. A missing attempt number falls back to the 1-based position.
    fn into_record(self, position: usize, fallback: Option<&MaterialId>) -> Option<AttemptRecord> {
        let material_id = material_id_or_warn(self.material_id).or_else(|| fallback.cloned());
        let Some(material_id) = material_id else {
            warn!("dropping attempt #{} without a material id", self.attempt_no);
            return None;
        };
        let number = if self.attempt_no == 0 {
            u32::try_from(position + 1).unwrap_or(u32::MAX)
        } else {
            self.attempt_no
        };
        let mode = self
            .mode
            .as_deref()
            .map_or(AttemptMode::Normal, AttemptMode::from_tag);
        Some(
            AttemptRecord::from_counts(
                number,
                material_id,
                self.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                self.correct,
                self.wrong,
                self.skipped,
            )
            .with_mode(mode),
        )
    }
}

fn into_history(attempts: Vec<AttemptDto>, fallback: Option<&MaterialId>) -> Vec<AttemptRecord> {
    attempts
        .into_iter()
        .enumerate()
        .filter_map(|(position, dto)| dto.into_record(position, fallback))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PerQuestionDto {
    #[serde(deserialize_with = "de_u32")]
    attempts: u32,
    #[serde(deserialize_with = "de_u32")]
    correct: u32,
    #[serde(deserialize_with = "de_u32")]
    skipped: u32,
}

fn into_per_question(raw: BTreeMap<String, PerQuestionDto>) -> BTreeMap<usize, PerQuestionStat> {
    raw.into_iter()
        .filter_map(|(key, dto)| {
            let index = key.trim().parse::<usize>().ok()?;
            Some((index, PerQuestionStat::new(dto.attempts, dto.correct, dto.skipped)))
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UnsolvedDto {
    #[serde(deserialize_with = "de_u32")]
    index: u32,
    #[serde(deserialize_with = "de_string")]
    question: String,
    #[serde(deserialize_with = "de_string_list")]
    options: Vec<String>,
    #[serde(deserialize_with = "de_opt_string")]
    correct_answer: Option<String>,
}

impl From<UnsolvedDto> for UnsolvedQuestion {
    fn from(dto: UnsolvedDto) -> Self {
        Self {
            index: dto.index as usize,
            question: dto.question,
            options: dto.options,
            correct_answer: dto.correct_answer,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct QuizStatsDto {
    #[serde(deserialize_with = "de_object_list")]
    history: Vec<AttemptDto>,
    #[serde(deserialize_with = "de_object_map")]
    per_question: BTreeMap<String, PerQuestionDto>,
    #[serde(deserialize_with = "de_object_list")]
    last_unsolved: Vec<UnsolvedDto>,
}

impl QuizStatsDto {
    pub(crate) fn into_snapshot(self, material_id: &MaterialId) -> QuizStatsSnapshot {
        QuizStatsSnapshot {
            history: into_history(self.history, Some(material_id)),
            per_question: into_per_question(self.per_question),
            last_unsolved: self.last_unsolved.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SubmissionDto {
    attempt: Option<AttemptDto>,
    quiz_stats: QuizStatsDto,
}

impl SubmissionDto {
    pub(crate) fn into_receipt(self, material_id: &MaterialId) -> Result<SubmissionReceipt, GatewayError> {
        let stats = self.quiz_stats.into_snapshot(material_id);
        let position = stats.history.len().saturating_sub(1);
        let attempt = self
            .attempt
            .and_then(|dto| dto.into_record(position, Some(material_id)))
            .or_else(|| stats.history.last().cloned())
            .ok_or_else(|| GatewayError::Backend("the attempt was not recorded".into()))?;
        Ok(SubmissionReceipt { attempt, stats })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RevisionDto {
    #[serde(deserialize_with = "de_object_list")]
    revision_questions: Vec<QuizQuestionDto>,
    #[serde(deserialize_with = "de_index_list")]
    revision_indices: Vec<usize>,
    stats: QuizStatsDto,
}

impl RevisionDto {
    pub(crate) fn into_revision(self, material_id: &MaterialId) -> RevisionQuiz {
        RevisionQuiz {
            questions: self.revision_questions.into_iter().map(Into::into).collect(),
            indices: self.revision_indices,
            stats: self.stats.into_snapshot(material_id),
        }
    }
}

// ─── Dashboards ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MaterialOverviewDto {
    #[serde(deserialize_with = "de_opt_string")]
    material_id: Option<String>,
    #[serde(deserialize_with = "de_u32")]
    total_attempts: u32,
    #[serde(deserialize_with = "de_f64")]
    avg_accuracy: f64,
    #[serde(deserialize_with = "de_opt_datetime")]
    last_attempt_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GlobalStatsDto {
    #[serde(deserialize_with = "de_u32")]
    total_attempts: u32,
    #[serde(deserialize_with = "de_u32")]
    total_materials: u32,
    #[serde(deserialize_with = "de_f64")]
    avg_accuracy: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OverviewDto {
    #[serde(deserialize_with = "de_object_list")]
    materials: Vec<MaterialOverviewDto>,
    global_stats: GlobalStatsDto,
}

impl From<OverviewDto> for DashboardOverview {
    fn from(dto: OverviewDto) -> Self {
        Self {
            materials: dto
                .materials
                .into_iter()
                .filter_map(|m| {
                    Some(MaterialOverview {
                        material_id: material_id_or_warn(m.material_id)?,
                        total_attempts: m.total_attempts,
                        avg_accuracy_pct: m.avg_accuracy,
                        last_attempt_at: m.last_attempt_at,
                    })
                })
                .collect(),
            total_attempts: dto.global_stats.total_attempts,
            total_materials: dto.global_stats.total_materials,
            avg_accuracy_pct: dto.global_stats.avg_accuracy,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserSummaryDto {
    #[serde(deserialize_with = "de_u32")]
    total_attempts: u32,
    #[serde(deserialize_with = "de_u32")]
    distinct_materials: u32,
    #[serde(deserialize_with = "de_f64")]
    overall_accuracy: f64,
    #[serde(deserialize_with = "de_f64")]
    avg_score: f64,
    #[serde(deserialize_with = "de_f64")]
    avg_accuracy: f64,
    #[serde(deserialize_with = "de_f64")]
    best_score: f64,
    #[serde(deserialize_with = "de_f64")]
    best_accuracy: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ByDateDto {
    #[serde(deserialize_with = "de_string")]
    date: String,
    #[serde(deserialize_with = "de_u32")]
    attempts: u32,
    #[serde(deserialize_with = "de_f64")]
    avg_score: f64,
    #[serde(deserialize_with = "de_f64")]
    avg_accuracy: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UserDashboardDto {
    summary: UserSummaryDto,
    #[serde(deserialize_with = "de_object_list")]
    attempts: Vec<AttemptDto>,
    #[serde(deserialize_with = "de_object_list")]
    by_date: Vec<ByDateDto>,
}

impl From<UserDashboardDto> for UserDashboard {
    fn from(dto: UserDashboardDto) -> Self {
        let s = dto.summary;
        Self {
            summary: UserSummary {
                total_attempts: s.total_attempts,
                distinct_materials: s.distinct_materials,
                overall_accuracy_pct: s.overall_accuracy,
                avg_score: s.avg_score,
                avg_accuracy_pct: s.avg_accuracy,
                best_score: s.best_score,
                best_accuracy_pct: s.best_accuracy,
            },
            attempts: into_history(dto.attempts, None),
            by_date: dto
                .by_date
                .into_iter()
                .filter_map(|day| {
                    let date = NaiveDate::parse_from_str(day.date.trim(), "%Y-%m-%d").ok()?;
                    Some(DailyActivity {
                        date,
                        attempts: day.attempts,
                        avg_score: day.avg_score,
                        avg_accuracy_pct: day.avg_accuracy,
                    })
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MaterialInfoDto {
    #[serde(deserialize_with = "de_opt_string")]
    topic: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    source_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MaterialDashboardDto {
    material_info: MaterialInfoDto,
    #[serde(deserialize_with = "de_object_list")]
    quiz_history: Vec<AttemptDto>,
    #[serde(deserialize_with = "de_object_map")]
    per_question: BTreeMap<String, PerQuestionDto>,
    #[serde(deserialize_with = "de_object_list")]
    last_unsolved: Vec<UnsolvedDto>,
}

impl MaterialDashboardDto {
    pub(crate) fn into_dashboard(self, material_id: &MaterialId) -> MaterialDashboard {
        MaterialDashboard {
            material_id: material_id.clone(),
            topic: self.material_info.topic,
            source_name: self.material_info.source_name,
            stats: QuizStatsSnapshot {
                history: into_history(self.quiz_history, Some(material_id)),
                per_question: into_per_question(self.per_question),
                last_unsolved: self.last_unsolved.into_iter().map(Into::into).collect(),
            },
        }
    }
}

// ─── Videos, mind map, mock test ───────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VideoDto {
    #[serde(deserialize_with = "de_string")]
    video_id: String,
    #[serde(deserialize_with = "de_string")]
    title: String,
    #[serde(deserialize_with = "de_string")]
    channel_title: String,
    #[serde(deserialize_with = "de_opt_string")]
    thumbnail: Option<String>,
    #[serde(deserialize_with = "de_opt_string")]
    published_at: Option<String>,
    #[serde(deserialize_with = "de_string")]
    description: String,
    #[serde(deserialize_with = "de_string")]
    duration: String,
    #[serde(deserialize_with = "de_opt_u64")]
    view_count: Option<u64>,
    #[serde(deserialize_with = "de_opt_u64")]
    like_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct VideosDto {
    #[serde(deserialize_with = "de_object_list")]
    videos: Vec<VideoDto>,
}

impl From<VideosDto> for Vec<Video> {
    fn from(dto: VideosDto) -> Self {
        dto.videos
            .into_iter()
            .filter(|v| !v.video_id.is_empty())
            .map(|v| Video {
                duration_secs: parse_iso8601_duration(&v.duration),
                video_id: v.video_id,
                title: v.title,
                channel_title: v.channel_title,
                thumbnail: v.thumbnail,
                published_at: v.published_at,
                description: v.description,
                view_count: v.view_count,
                like_count: v.like_count,
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MindmapStructureDto {
    #[serde(deserialize_with = "de_string")]
    root: String,
    #[serde(deserialize_with = "de_string_list")]
    topics: Vec<String>,
    points_by_topic: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MindmapDto {
    #[serde(deserialize_with = "de_string")]
    topic: String,
    #[serde(deserialize_with = "de_string")]
    image_base64: String,
    #[serde(deserialize_with = "de_string")]
    mime: String,
    #[serde(deserialize_with = "de_u32")]
    width: u32,
    #[serde(deserialize_with = "de_u32")]
    height: u32,
    structure: MindmapStructureDto,
}

impl From<MindmapDto> for Mindmap {
    fn from(dto: MindmapDto) -> Self {
        Self {
            topic: dto.topic,
            image_base64: dto.image_base64,
            mime: dto.mime,
            width: dto.width,
            height: dto.height,
            structure: MindmapStructure {
                root: dto.structure.root,
                topics: dto.structure.topics,
                points_by_topic: dto.structure.points_by_topic,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MockQuestionDto {
    #[serde(deserialize_with = "de_string")]
    question: String,
    #[serde(deserialize_with = "de_u32")]
    marks: u32,
    #[serde(alias = "model_answer", deserialize_with = "de_opt_string")]
    answer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MockTestDto {
    #[serde(alias = "topic", deserialize_with = "de_string")]
    title: String,
    #[serde(deserialize_with = "de_u32")]
    total_marks: u32,
    #[serde(deserialize_with = "de_u32")]
    total_questions: u32,
    #[serde(deserialize_with = "de_object_list")]
    questions: Vec<MockQuestionDto>,
}

impl From<MockTestDto> for MockTest {
    fn from(dto: MockTestDto) -> Self {
        let questions: Vec<MockQuestion> = dto
            .questions
            .into_iter()
            .filter(|q| !q.question.trim().is_empty())
            .map(|q| MockQuestion {
                question: q.question,
                marks: q.marks,
                answer: q.answer,
            })
            .collect();
        let total_questions = if dto.total_questions == 0 {
            u32::try_from(questions.len()).unwrap_or(u32::MAX)
        } else {
            dto.total_questions
        };
        let total_marks = if dto.total_marks == 0 {
            questions.iter().map(|q| q.marks).fold(0, u32::saturating_add)
        } else {
            dto.total_marks
        };
        Self {
            title: dto.title,
            total_marks,
            total_questions,
            questions,
        }
    }
}

// ─── Request bodies ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct TextUploadBody<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AskBody<'a> {
    pub text: &'a str,
    pub question: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VideosBody<'a> {
    pub key_topics: &'a [String],
    pub key_points: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
    pub max_results: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct MindmapBody<'a> {
    pub summary: &'a str,
    pub key_topics: &'a [String],
    pub key_points: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct PatternBody {
    pub marks: u32,
    pub count: u32,
}

impl From<&MarkPattern> for PatternBody {
    fn from(p: &MarkPattern) -> Self {
        Self {
            marks: p.marks,
            count: p.count,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MockTestBody<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<&'a str>,
    pub summary: &'a str,
    pub key_points: &'a [String],
    pub pattern: Vec<PatternBody>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionBody<'a> {
    pub user_id: &'a str,
    pub material_id: &'a str,
    /// Keys are decimal question indices; `null` marks a skipped question.
    pub answers: BTreeMap<String, Option<&'a str>>,
    pub unsolved_questions: Vec<usize>,
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_indices: Option<Vec<usize>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RevisionBody<'a> {
    pub user_id: &'a str,
    pub material_id: &'a str,
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material_id() -> MaterialId {
        MaterialId::new("m-1").unwrap()
    }

    #[test]
    fn error_envelopes_become_backend_errors() {
        let err = decode::<MaterialDto>(r#"{"error": true, "message": "No PDF or text received."}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "No PDF or text received.");

        let err = decode::<MindmapDto>(r#"{"error": "Graphviz not installed", "details": "pip install graphviz"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Graphviz not installed (pip install graphviz)");
    }

    #[test]
    fn false_error_flag_is_not_an_error() {
        let dto = decode::<AnswerDto>(r#"{"error": false, "answer": "42"}"#).unwrap();
        assert_eq!(dto.answer, "42");
    }

    #[test]
    fn material_decodes_with_aliases_and_missing_fields() {
        let body = r#"{
            "material_id": 17,
            "summaryText": "  Cells are small.  ",
            "key_topics": ["Biology", "", 3],
            "flashcards": [{"front": "Cell?", "back": "Unit of life"}, {"front": " "}],
            "quiz": [{"question": "Smallest unit?", "options": ["Atom", "Cell"], "answer": "Cell"}]
        }"#;
        let material: StudyMaterial = decode::<MaterialDto>(body).unwrap().into();

        assert_eq!(material.material_id.as_ref().map(MaterialId::as_str), Some("17"));
        assert_eq!(material.summary, "Cells are small.");
        assert_eq!(material.key_topics, vec!["Biology".to_string(), "3".to_string()]);
        assert!(material.key_points.is_empty());
        assert_eq!(material.flashcards.len(), 1);
        assert_eq!(material.quiz[0].answer, "Cell");
        assert_eq!(material.quiz[0].explanation, None);
        assert_eq!(material.source_type, SourceType::Pdf);
    }

    #[test]
    fn null_and_malformed_list_elements_do_not_fail_the_material() {
        let material: StudyMaterial =
            decode::<MaterialDto>(r#"{"summary": "s", "flashcards": null, "quiz": []}"#)
                .unwrap()
                .into();
        assert_eq!(material.summary, "s");
        assert!(material.flashcards.is_empty());

        let body = r#"{
            "summary": "s",
            "flashcards": ["just a string", {"front": "Cell?", "back": "Unit of life"}],
            "quiz": {"question": "not a list"}
        }"#;
        let material: StudyMaterial = decode::<MaterialDto>(body).unwrap().into();
        assert_eq!(material.flashcards.len(), 1);
        assert_eq!(material.flashcards[0].front, "Cell?");
        assert!(material.quiz.is_empty());
    }

    #[test]
    fn malformed_stats_entries_are_skipped() {
        let body = r#"{
            "history": [7, {"attempt_no": 1, "correct": 2, "wrong": 0, "skipped": 1}],
            "per_question": {"0": {"attempts": 2, "correct": 1}, "1": "broken"},
            "last_unsolved": null
        }"#;
        let dto: QuizStatsDto = serde_json::from_str(body).unwrap();
        let snapshot = dto.into_snapshot(&material_id());
        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(snapshot.per_question.len(), 1);
        assert_eq!(snapshot.per_question[&0].correct, 1);
        assert!(snapshot.last_unsolved.is_empty());
    }

    #[test]
    fn data_envelope_is_unwrapped() {
        let material: StudyMaterial = decode::<MaterialDto>(r#"{"data": {"summary": "Inner"}}"#)
            .unwrap()
            .into();
        assert_eq!(material.summary, "Inner");
        assert!(material.material_id.is_none());
    }

    #[test]
    fn empty_body_decodes_to_defaults() {
        let overview: DashboardOverview = decode::<OverviewDto>("").unwrap().into();
        assert!(overview.materials.is_empty());
        assert_eq!(overview.total_attempts, 0);
    }

    #[test]
    fn quiz_stats_history_and_per_question() {
        let body = r#"{
            "history": [
                {"mode": "normal", "correct": 3, "wrong": 1, "skipped": 1, "attempted": 4,
                 "total_questions": 5, "attempt_no": 1, "created_at": "2024-03-01T10:00:00.123456"},
                {"mode": "revision", "correct": 1.0, "wrong": 0, "skipped": 0, "created_at": null}
            ],
            "per_question": {"0": {"attempts": 2, "correct": 1, "skipped": 0}, "x": {"attempts": 9}},
            "last_unsolved": [{"index": 4, "question": "Q5", "options": ["a"], "correct_answer": "a"}]
        }"#;
        let dto: QuizStatsDto = serde_json::from_str(body).unwrap();
        let snapshot = dto.into_snapshot(&material_id());

        assert_eq!(snapshot.history.len(), 2);
        let first = &snapshot.history[0];
        assert_eq!(first.attempt_number, 1);
        assert_eq!((first.attempted, first.total_questions), (4, 5));
        assert_eq!(first.created_at.to_rfc3339(), "2024-03-01T10:00:00.123456+00:00");
        let second = &snapshot.history[1];
        assert_eq!(second.attempt_number, 2);
        assert_eq!(second.mode, AttemptMode::Revision);
        assert_eq!(second.created_at, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(second.material_id, material_id());

        assert_eq!(snapshot.per_question.len(), 1);
        assert_eq!(snapshot.per_question[&0], PerQuestionStat::new(2, 1, 0));
        assert_eq!(snapshot.last_unsolved[0].index, 4);
    }

    #[test]
    fn user_dashboard_rows_use_backend_column_names() {
        let body = r#"{
            "summary": {"total_attempts": 1, "avg_accuracy": 75.0},
            "attempts": [{"attempt_no": 1, "material_id": "m-2", "created_at": "2024-03-01T10:00:00+00:00",
                          "correct": 3, "wrong": 1, "skipped": 0, "total_questions": 4}],
            "by_date": [{"date": "2024-03-01", "attempts": 1, "avg_score": 3, "avg_accuracy": 75},
                        {"date": "", "attempts": 1}]
        }"#;
        let dashboard: UserDashboard = decode::<UserDashboardDto>(body).unwrap().into();
        assert_eq!(dashboard.summary.total_attempts, 1);
        assert!((dashboard.summary.avg_accuracy_pct - 75.0).abs() < 1e-9);
        assert_eq!(dashboard.attempts[0].material_id.as_str(), "m-2");
        assert_eq!(dashboard.by_date.len(), 1);
    }

    #[test]
    fn submission_without_attempt_falls_back_to_history() {
        let body = r#"{"ok": true, "quiz_stats": {"history": [{"attempt_no": 4, "correct_answers": 2, "wrong_answers": 2}]}}"#;
        let receipt = decode::<SubmissionDto>(body)
            .unwrap()
            .into_receipt(&material_id())
            .unwrap();
        assert_eq!(receipt.attempt.attempt_number, 4);
        assert_eq!(receipt.attempt.attempted, 4);

        let err = decode::<SubmissionDto>(r#"{"ok": true}"#)
            .unwrap()
            .into_receipt(&material_id())
            .unwrap_err();
        assert!(matches!(err, GatewayError::Backend(_)));
    }

    #[test]
    fn videos_parse_counts_and_durations() {
        let body = r#"{"videos": [
            {"videoId": "v1", "title": "Intro", "duration": "PT1H2M3S", "viewCount": "1200"},
            {"title": "missing id"}
        ]}"#;
        let videos: Vec<Video> = decode::<VideosDto>(body).unwrap().into();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].duration_secs, 3723);
        assert_eq!(videos[0].view_count, Some(1200));
        assert_eq!(videos[0].like_count, None);
    }

    #[test]
    fn iso_durations() {
        assert_eq!(parse_iso8601_duration("PT45S"), 45);
        assert_eq!(parse_iso8601_duration("PT10M"), 600);
        assert_eq!(parse_iso8601_duration("P1DT1H"), 0);
        assert_eq!(parse_iso8601_duration("PT5"), 0);
        assert_eq!(parse_iso8601_duration(""), 0);
    }

    #[test]
    fn timestamps_accept_common_shapes() {
        assert!(parse_timestamp("2024-03-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2024-03-01 10:00:00").is_some());
        assert_eq!(
            parse_timestamp("2024-03-01").map(|t| t.date_naive()),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn mock_test_totals_fill_in_from_questions() {
        let body = r#"{"topic": "Cells", "questions": [{"question": "Define", "marks": 5}, {"question": "List", "marks": 2}]}"#;
        let test: MockTest = decode::<MockTestDto>(body).unwrap().into();
        assert_eq!(test.title, "Cells");
        assert_eq!(test.total_questions, 2);
        assert_eq!(test.total_marks, 7);
    }

    #[test]
    fn submission_body_serializes_skips_as_null() {
        let mut answers = BTreeMap::new();
        answers.insert("0".to_string(), Some("Cell"));
        answers.insert("1".to_string(), None);
        let body = SubmissionBody {
            user_id: "u",
            material_id: "m",
            answers,
            unsolved_questions: vec![1],
            mode: "normal",
            question_indices: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["answers"]["1"], Value::Null);
        assert_eq!(json["unsolved_questions"][0], 1);
        assert!(json.get("question_indices").is_none());
    }
}
