use bson::{DateTime, doc, oid::ObjectId};
use crewdeck_db::models::Note;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct NoteDao {
    pub base: BaseDao<Note>,
}

impl NoteDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Note::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        company_id: ObjectId,
        project_id: Option<ObjectId>,
        title: String,
        content: String,
    ) -> DaoResult<Note> {
        let now = DateTime::now();
        let note = Note {
            id: None,
            company_id,
            project_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&note).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(&self, company_id: ObjectId) -> DaoResult<Vec<Note>> {
        self.base
            .find_many(
                doc! { "company_id": company_id },
                Some(doc! { "created_at": -1 }),
            )
            .await
    }

    pub async fn update(
        &self,
        company_id: ObjectId,
        note_id: ObjectId,
        title: Option<String>,
        content: Option<String>,
    ) -> DaoResult<Note> {
        let mut update = bson::Document::new();
        if let Some(title) = title {
            update.insert("title", title);
        }
        if let Some(content) = content {
            update.insert("content", content);
        }

        if !update.is_empty() {
            let matched = self
                .base
                .update_one(
                    doc! { "_id": note_id, "company_id": company_id },
                    doc! { "$set": update },
                )
                .await?;
            if !matched {
                return Err(DaoError::NotFound);
            }
        }
        self.base.find_by_id_in_company(company_id, note_id).await
    }

    pub async fn delete(&self, company_id: ObjectId, note_id: ObjectId) -> DaoResult<()> {
        let deleted = self
            .base
            .hard_delete(doc! { "_id": note_id, "company_id": company_id })
            .await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
