use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::store::QuestionStore;
use crate::models::{store_now, Question, Subject, ValidQuestion};

/// Process-local store with the same id and timestamp behaviour as MongoDB.
/// Ordered by id, which tracks insertion order within one process.
#[derive(Clone, Default)]
pub struct InMemoryQuestionStore {
    questions: Arc<RwLock<BTreeMap<ObjectId, Question>>>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.questions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.questions.read().await.is_empty()
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn insert(&self, question: ValidQuestion) -> Result<Question, AppError> {
        let now = store_now();
        let record = Question {
            id: ObjectId::new(),
            subject: question.subject,
            text: question.text,
            choices: question.choices,
            answer_index: question.answer_index,
            explanation: question.explanation,
            created_at: now,
            updated_at: now,
        };

        self.questions
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self, subject: Option<Subject>) -> Result<Vec<Question>, AppError> {
        let questions = self.questions.read().await;
        Ok(questions
            .values()
            .filter(|q| subject.map_or(true, |s| q.subject == s))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Question>, AppError> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn replace(
        &self,
        id: &ObjectId,
        question: ValidQuestion,
    ) -> Result<Option<Question>, AppError> {
        let mut questions = self.questions.write().await;
        let Some(record) = questions.get_mut(id) else {
            return Ok(None);
        };

        record.subject = question.subject;
        record.text = question.text;
        record.choices = question.choices;
        record.answer_index = question.answer_index;
        record.explanation = question.explanation;
        record.updated_at = store_now();

        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        Ok(self.questions.write().await.remove(id).is_some())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
