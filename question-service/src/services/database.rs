use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    error::{Error as MongoError, ErrorKind},
    options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

use super::store::QuestionStore;
use crate::models::{store_now, Question, Subject, ValidQuestion};

pub const QUESTIONS_COLLECTION: &str = "questions";

#[derive(Clone)]
pub struct MongoQuestionStore {
    client: MongoClient,
    db: Database,
}

impl MongoQuestionStore {
    /// Connect and verify the server answers before returning, so a bad URI or
    /// unreachable server stops startup instead of failing the first request.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Invalid MongoDB connection string: {}", e);
            AppError::ConfigError(anyhow::anyhow!("Invalid MongoDB connection string: {}", e))
        })?;
        options.app_name = Some("question-service".to_string());

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        let store = Self { client, db };

        store.health_check().await?;
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(store)
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for question-service");

        // Serves the `?subject=` list filter
        let subject_index = IndexModel::builder()
            .keys(doc! { "subject": 1 })
            .options(
                IndexOptions::builder()
                    .name("subject_idx".to_string())
                    .build(),
            )
            .build();

        self.questions()
            .create_index(subject_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create subject index: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on questions.subject");

        Ok(())
    }

    pub fn questions(&self) -> Collection<Question> {
        self.db.collection(QUESTIONS_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

/// Server-side write rejections (document validation, duplicate keys) are the
/// client's fault; everything else is an infrastructure failure.
fn write_error(e: MongoError) -> AppError {
    match e.kind.as_ref() {
        ErrorKind::Write(_) | ErrorKind::BulkWrite(_) => {
            tracing::warn!("MongoDB rejected write: {}", e);
            AppError::BadRequest(anyhow::anyhow!(e.to_string()))
        }
        _ => {
            tracing::error!("MongoDB write failed: {}", e);
            AppError::from(e)
        }
    }
}

fn set_fields(question: &ValidQuestion) -> Document {
    doc! {
        "subject": question.subject.as_str(),
        "text": question.text.clone(),
        "choices": question.choices.clone(),
        "answerIndex": question.answer_index,
        "updatedAt": mongodb::bson::DateTime::from_chrono(store_now()),
    }
}

#[async_trait]
impl QuestionStore for MongoQuestionStore {
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

        self.questions()
            .insert_one(&record, None)
            .await
            .map_err(write_error)?;

        Ok(record)
    }

    async fn list(&self, subject: Option<Subject>) -> Result<Vec<Question>, AppError> {
        let filter = match subject {
            Some(subject) => doc! { "subject": subject.as_str() },
            None => doc! {},
        };
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();

        let cursor = self.questions().find(filter, options).await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Question>, AppError> {
        Ok(self.questions().find_one(doc! { "_id": *id }, None).await?)
    }

    async fn replace(
        &self,
        id: &ObjectId,
        question: ValidQuestion,
    ) -> Result<Option<Question>, AppError> {
        let mut set = set_fields(&question);
        let update = match question.explanation {
            Some(explanation) => {
                set.insert("explanation", explanation);
                doc! { "$set": set }
            }
            None => doc! { "$set": set, "$unset": { "explanation": "" } },
        };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.questions()
            .find_one_and_update(doc! { "_id": *id }, update, options)
            .await
            .map_err(write_error)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.questions().delete_one(doc! { "_id": *id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
