pub mod draft;
pub mod question;

pub use draft::{QuestionDraft, ValidQuestion, ValidationError};
pub use question::{parse_question_id, store_now, Question, QuestionResponse, Subject};
