pub mod answers;
pub mod report;
pub mod steps;

pub use answers::{AnswerField, AnswerValue, ChecklistAnswers};
pub use report::{build_report, render_text, ChecklistReport};
pub use steps::{visible_questions, Question, QuestionKind, Step, STEPS};
