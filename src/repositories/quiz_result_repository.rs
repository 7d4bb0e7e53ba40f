use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{db::Database, errors::AppResult, models::domain::QuizResult};

/// Results are append-only: there is no update or delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizResultRepository: Send + Sync {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<QuizResult>>;
    /// Newest first.
    async fn find_by_user(&self, user_id: &ObjectId) -> AppResult<Vec<QuizResult>>;
    /// Newest first.
    async fn find_by_quizzes(&self, quiz_ids: &[ObjectId]) -> AppResult<Vec<QuizResult>>;
}

pub struct MongoQuizResultRepository {
    collection: Collection<QuizResult>,
}

impl MongoQuizResultRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_results collection");

        let user_index = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .options(IndexOptions::builder().name("user".to_string()).build())
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz": 1 })
            .options(IndexOptions::builder().name("quiz".to_string()).build())
            .build();

        self.collection.create_index(user_index).await?;
        self.collection.create_index(quiz_index).await?;

        log::info!("Successfully created indexes for quiz_results collection");
        Ok(())
    }

    async fn find_newest_first(&self, filter: Document) -> AppResult<Vec<QuizResult>> {
        // ObjectIds embed their creation second, so `_id` order is submission order.
        let results = self
            .collection
            .find(filter)
            .sort(doc! { "_id": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(results)
    }
}

#[async_trait]
impl QuizResultRepository for MongoQuizResultRepository {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<QuizResult>> {
        let result = self.collection.find_one(doc! { "_id": *id }).await?;
        Ok(result)
    }

    async fn find_by_user(&self, user_id: &ObjectId) -> AppResult<Vec<QuizResult>> {
        self.find_newest_first(doc! { "user": *user_id }).await
    }

    async fn find_by_quizzes(&self, quiz_ids: &[ObjectId]) -> AppResult<Vec<QuizResult>> {
        if quiz_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_newest_first(doc! { "quiz": { "$in": quiz_ids.to_vec() } })
            .await
    }
}
