pub mod question;
pub mod quiz;

pub use question::{CorrectAnswer, Question, QuestionDocument, QuestionType};
pub use quiz::{QuizPresentation, QuizSpec};
