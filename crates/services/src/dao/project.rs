use bson::{DateTime, doc, oid::ObjectId};
use crewdeck_db::models::{Project, ProjectStatus, Task, TaskAssignment};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct ProjectDao {
    pub base: BaseDao<Project>,
    tasks: BaseDao<Task>,
    assignments: BaseDao<TaskAssignment>,
}

impl ProjectDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Project::COLLECTION),
            tasks: BaseDao::new(db, Task::COLLECTION),
            assignments: BaseDao::new(db, TaskAssignment::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        company_id: ObjectId,
        name: String,
        description: Option<String>,
        status: ProjectStatus,
    ) -> DaoResult<Project> {
        let now = DateTime::now();
        let project = Project {
            id: None,
            company_id,
            name,
            description,
            status,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&project).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(&self, company_id: ObjectId) -> DaoResult<Vec<Project>> {
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
        project_id: ObjectId,
        name: Option<String>,
        description: Option<String>,
        status: Option<ProjectStatus>,
    ) -> DaoResult<Project> {
        let mut update = bson::Document::new();
        if let Some(name) = name {
            update.insert("name", name);
        }
        if let Some(description) = description {
            update.insert("description", description);
        }
        if let Some(status) = status {
            update.insert("status", bson::to_bson(&status)?);
        }

        if !update.is_empty() {
            let matched = self
                .base
                .update_one(
                    doc! { "_id": project_id, "company_id": company_id },
                    doc! { "$set": update },
                )
                .await?;
            if !matched {
                return Err(DaoError::NotFound);
            }
        }
        self.base.find_by_id_in_company(company_id, project_id).await
    }

    /// Delete a project and cascade its tasks and their assignments.
    pub async fn delete(&self, company_id: ObjectId, project_id: ObjectId) -> DaoResult<()> {
        let deleted = self
            .base
            .hard_delete(doc! { "_id": project_id, "company_id": company_id })
            .await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        self.tasks
            .hard_delete(doc! { "project_id": project_id, "company_id": company_id })
            .await?;
        self.assignments
            .hard_delete(doc! { "project_id": project_id, "company_id": company_id })
            .await?;
        Ok(())
    }
}
