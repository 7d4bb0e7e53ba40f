use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Quiz>>;
    async fn find_all(&self) -> AppResult<Vec<Quiz>>;
    async fn find_active(&self) -> AppResult<Vec<Quiz>>;
    async fn find_by_owner(&self, owner_id: &ObjectId) -> AppResult<Vec<Quiz>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Quiz>>;
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn update(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn delete(&self, id: &ObjectId) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let owner_index = IndexModel::builder()
            .keys(doc! { "created_by": 1 })
            .options(IndexOptions::builder().name("created_by".to_string()).build())
            .build();

        let active_index = IndexModel::builder()
            .keys(doc! { "is_active": 1 })
            .options(IndexOptions::builder().name("is_active".to_string()).build())
            .build();

        self.collection.create_index(owner_index).await?;
        self.collection.create_index(active_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }

    async fn find_many(&self, filter: Document) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "_id": *id }).await?;
        Ok(quiz)
    }

    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        self.find_many(doc! {}).await
    }

    async fn find_active(&self) -> AppResult<Vec<Quiz>> {
        self.find_many(doc! { "is_active": true }).await
    }

    async fn find_by_owner(&self, owner_id: &ObjectId) -> AppResult<Vec<Quiz>> {
        self.find_many(doc! { "created_by": *owner_id }).await
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Quiz>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": ids.to_vec() } }).await
    }

    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let result = self
            .collection
            .replace_one(doc! { "_id": quiz.id }, &quiz)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        Ok(quiz)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }

        Ok(())
    }
}
