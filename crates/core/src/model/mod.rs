mod answer_sheet;
mod attempt;
mod ids;
mod material;
mod question_stat;

pub use answer_sheet::AnswerSheet;
pub use attempt::{AttemptMode, AttemptRecord};
pub use ids::{IdError, MaterialId, UserId};
pub use material::{Flashcard, QuizQuestion, SourceType, StudyMaterial};
pub use question_stat::{PerQuestionStat, QuizStatsSnapshot, UnsolvedQuestion};
