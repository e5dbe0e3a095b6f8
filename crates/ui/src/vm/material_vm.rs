use std::collections::BTreeMap;

use services::FlashcardDeck;
use services::gateway::{MarkPattern, Mindmap, MockQuestion, MockTest, Video};
use study_core::model::{SourceType, StudyMaterial};

use crate::vm::format::palette_color;
use crate::vm::markdown_vm::markdown_to_html;
use crate::vm::time_fmt::format_duration;

// ─── Material ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialVm {
    pub title: String,
    pub source_label: String,
    pub summary_html: String,
    pub key_topics: Vec<String>,
    pub key_points: Vec<String>,
    pub flashcard_count: usize,
    pub quiz_count: usize,
    /// Quiz attempts can only be recorded for materials the backend saved.
    pub is_trackable: bool,
}

impl From<&StudyMaterial> for MaterialVm {
    fn from(material: &StudyMaterial) -> Self {
        let kind = match material.source_type {
            SourceType::Pdf => "PDF",
            SourceType::Text => "Pasted text",
        };
        let source_label = match &material.source_name {
            Some(name) if !name.is_empty() => format!("{kind} · {name}"),
            _ => kind.to_string(),
        };
        Self {
            title: material.title().to_string(),
            source_label,
            summary_html: markdown_to_html(&material.summary),
            key_topics: material.key_topics.clone(),
            key_points: material.key_points.clone(),
            flashcard_count: material.flashcards.len(),
            quiz_count: material.quiz.len(),
            is_trackable: material.is_trackable(),
        }
    }
}

/// Answer text from the ask box, rendered like the summary.
#[must_use]
pub fn map_answer_html(answer: &str) -> String {
    markdown_to_html(answer)
}

// ─── Flashcards ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashcardVm {
    pub text: String,
    pub side_label: &'static str,
    pub position_label: String,
    pub is_flipped: bool,
}

impl FlashcardVm {
    #[must_use]
    pub fn from_deck(deck: &FlashcardDeck) -> Option<Self> {
        let card = deck.current()?;
        let is_flipped = deck.is_flipped();
        Some(Self {
            text: if is_flipped {
                card.back.clone()
            } else {
                card.front.clone()
            },
            side_label: if is_flipped { "Answer" } else { "Prompt" },
            position_label: format!("{} / {}", deck.position(), deck.len()),
            is_flipped,
        })
    }
}

// ─── Videos ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoCardVm {
    pub title: String,
    pub channel: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub duration_str: Option<String>,
    pub views_str: Option<String>,
}

impl From<&Video> for VideoCardVm {
    fn from(video: &Video) -> Self {
        Self {
            title: video.title.clone(),
            channel: video.channel_title.clone(),
            url: video.watch_url(),
            thumbnail: video.thumbnail.clone().filter(|t| !t.is_empty()),
            duration_str: (video.duration_secs > 0).then(|| format_duration(video.duration_secs)),
            views_str: video.view_count.map(|n| format!("{} views", compact_count(n))),
        }
    }
}

#[must_use]
pub fn map_videos(videos: &[Video]) -> Vec<VideoCardVm> {
    videos.iter().map(VideoCardVm::from).collect()
}

/// `950`, `1.2K`, `3.4M`.
#[must_use]
pub fn compact_count(n: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let value = n as f64;
    if n >= 1_000_000 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        n.to_string()
    }
}

// ─── Mind map ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MindmapBranchVm {
    pub topic: String,
    pub points: Vec<String>,
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MindmapVm {
    pub title: String,
    pub image_src: Option<String>,
    pub branches: Vec<MindmapBranchVm>,
}

impl From<&Mindmap> for MindmapVm {
    fn from(map: &Mindmap) -> Self {
        let structure = &map.structure;
        let title = if structure.root.is_empty() {
            map.topic.clone()
        } else {
            structure.root.clone()
        };
        let branches = structure
            .topics
            .iter()
            .enumerate()
            .map(|(i, topic)| MindmapBranchVm {
                topic: topic.clone(),
                points: structure
                    .points_by_topic
                    .get(topic)
                    .cloned()
                    .unwrap_or_default(),
                color: palette_color(i),
            })
            .collect();
        Self {
            title,
            image_src: map.data_uri(),
            branches,
        }
    }
}

// ─── Mock test ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockQuestionVm {
    pub number: usize,
    pub text: String,
    pub answer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockSectionVm {
    pub heading: String,
    pub questions: Vec<MockQuestionVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockTestVm {
    pub title: String,
    pub totals_str: String,
    pub sections: Vec<MockSectionVm>,
}

impl From<&MockTest> for MockTestVm {
    /// Questions are grouped by marks, highest first, and numbered across the paper.
    fn from(test: &MockTest) -> Self {
        let mut by_marks: BTreeMap<u32, Vec<&MockQuestion>> = BTreeMap::new();
        for question in &test.questions {
            by_marks.entry(question.marks).or_default().push(question);
        }

        let mut number = 0;
        let sections = by_marks
            .into_iter()
            .rev()
            .map(|(marks, questions)| MockSectionVm {
                heading: match marks {
                    1 => "1 mark each".to_string(),
                    n => format!("{n} marks each"),
                },
                questions: questions
                    .into_iter()
                    .map(|q| {
                        number += 1;
                        MockQuestionVm {
                            number,
                            text: q.question.clone(),
                            answer: q.answer.clone().filter(|a| !a.trim().is_empty()),
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: test.title.clone(),
            totals_str: format!(
                "{} questions · {} marks",
                test.total_questions, test.total_marks
            ),
            sections,
        }
    }
}

/// Parse a paper layout such as `10x3, 5x4` (marks x count). Blank input
/// means the default paper.
///
/// # Errors
///
/// Returns a message naming the first entry that is not `<marks>x<count>`
/// with both numbers positive.
pub fn parse_mark_pattern(input: &str) -> Result<Vec<MarkPattern>, String> {
    input
        .split([',', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = || format!("\"{entry}\" is not marks x count, e.g. 5x4");
            let (marks, count) = entry
                .split_once(['x', 'X', '*'])
                .ok_or_else(invalid)?;
            let marks: u32 = marks.trim().parse().map_err(|_| invalid())?;
            let count: u32 = count.trim().parse().map_err(|_| invalid())?;
            if marks == 0 || count == 0 {
                return Err(invalid());
            }
            Ok(MarkPattern { marks, count })
        })
        .collect()
}
