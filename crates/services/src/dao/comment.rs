use bson::{DateTime, doc, oid::ObjectId};
use crewdeck_db::models::Comment;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct CommentDao {
    pub base: BaseDao<Comment>,
}

impl CommentDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Comment::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        company_id: ObjectId,
        task_id: ObjectId,
        author_member_id: ObjectId,
        content: String,
    ) -> DaoResult<Comment> {
        let now = DateTime::now();
        let comment = Comment {
            id: None,
            company_id,
            task_id,
            author_member_id,
            content,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&comment).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(
        &self,
        company_id: ObjectId,
        task_id: Option<ObjectId>,
    ) -> DaoResult<Vec<Comment>> {
        let mut filter = doc! { "company_id": company_id };
        if let Some(task_id) = task_id {
            filter.insert("task_id", task_id);
        }
        self.base
            .find_many(filter, Some(doc! { "created_at": 1 }))
            .await
    }

    pub async fn update_content(
        &self,
        company_id: ObjectId,
        comment_id: ObjectId,
        content: String,
    ) -> DaoResult<Comment> {
        let matched = self
            .base
            .update_one(
                doc! { "_id": comment_id, "company_id": company_id },
                doc! { "$set": { "content": content } },
            )
            .await?;
        if !matched {
            return Err(DaoError::NotFound);
        }
        self.base.find_by_id_in_company(company_id, comment_id).await
    }

    pub async fn delete(&self, company_id: ObjectId, comment_id: ObjectId) -> DaoResult<()> {
        let deleted = self
            .base
            .hard_delete(doc! { "_id": comment_id, "company_id": company_id })
            .await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
