pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::MongoQuestionStore;
pub use memory::InMemoryQuestionStore;
pub use metrics::{get_metrics, init_metrics};
pub use store::QuestionStore;
