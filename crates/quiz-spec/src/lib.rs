#![allow(missing_docs)]

pub mod error;
pub mod render;
pub mod review;
pub mod schema;
pub mod selection;
pub mod session;
pub mod snapshot;
pub mod spec;
pub mod validate;

pub use error::{SessionError, ValidationError};
pub use render::{
    RenderChoice, RenderPayload, RenderQuestion, RenderStatus, build_render_payload,
    render_json_ui, render_text,
};
pub use review::{ChoiceReview, ChoiceStatus, QuestionReview, review_question};
pub use schema::quiz_schema;
pub use selection::Selection;
pub use session::{Advance, Progress, QuizSession, Score, SessionState};
pub use snapshot::SessionSnapshot;
pub use spec::{CorrectAnswer, Question, QuestionDocument, QuestionType, QuizPresentation, QuizSpec};
pub use validate::{ValidationIssue, ValidationResult, validate_quiz};
