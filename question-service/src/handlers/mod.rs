pub mod health;
pub mod metrics;
pub mod questions;

pub use health::{health_check, root};
pub use metrics::metrics;
pub use questions::{
    bulk_create_questions, create_question, delete_question, get_question, list_questions,
    update_question,
};
