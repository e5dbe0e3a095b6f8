use serde::{Deserialize, Serialize};

use crate::model::MaterialId;

/// Where the material text came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Pdf,
    Text,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// One multiple-choice question generated for a material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: Option<String>,
}

impl QuizQuestion {
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        self.answer == selected
    }
}

/// Generated study content for one uploaded document.
///
/// `material_id` is `None` when the backend could not persist the material
/// (no database configured, or no user id sent). Such a material can still be
/// read but its quiz cannot be submitted for tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub material_id: Option<MaterialId>,
    pub source_type: SourceType,
    pub source_name: Option<String>,
    pub summary: String,
    pub key_topics: Vec<String>,
    pub key_points: Vec<String>,
    pub flashcards: Vec<Flashcard>,
    pub quiz: Vec<QuizQuestion>,
}

impl StudyMaterial {
    #[must_use]
    pub fn is_trackable(&self) -> bool {
        self.material_id.is_some()
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.summary.trim().is_empty()
            || !self.key_points.is_empty()
            || !self.flashcards.is_empty()
            || !self.quiz.is_empty()
    }

    /// Display title: the source file name, then the first key topic.
    #[must_use]
    pub fn title(&self) -> &str {
        self.source_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.key_topics.first().map(String::as_str))
            .unwrap_or("Untitled material")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_source_name_then_topic() {
        let mut material = StudyMaterial {
            key_topics: vec!["Thermodynamics".into()],
            ..StudyMaterial::default()
        };
        assert_eq!(material.title(), "Thermodynamics");

        material.source_name = Some("notes.pdf".into());
        assert_eq!(material.title(), "notes.pdf");

        material.source_name = Some("  ".into());
        material.key_topics.clear();
        assert_eq!(material.title(), "Untitled material");
    }

    #[test]
    fn empty_material_has_no_content() {
        let material = StudyMaterial::default();
        assert!(!material.has_content());
        assert!(!material.is_trackable());
    }
}
