use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

use crate::models::{Question, Subject, ValidQuestion};

/// Persistence seam for questions. Each call is a single-document operation;
/// atomicity beyond one document is not provided.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Persist a validated question; the store assigns the id and timestamps.
    async fn insert(&self, question: ValidQuestion) -> Result<Question, AppError>;

    /// All questions, or only those with exactly `subject`.
    async fn list(&self, subject: Option<Subject>) -> Result<Vec<Question>, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Question>, AppError>;

    /// Overwrite the mutable fields and bump `updatedAt`; `createdAt` is kept.
    /// Returns the post-update record, or `None` if the id no longer exists.
    async fn replace(
        &self,
        id: &ObjectId,
        question: ValidQuestion,
    ) -> Result<Option<Question>, AppError>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
