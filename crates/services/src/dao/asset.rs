use bson::{DateTime, doc, oid::ObjectId};
use crewdeck_db::models::Asset;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct AssetDao {
    pub base: BaseDao<Asset>,
}

impl AssetDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Asset::COLLECTION),
        }
    }

    /// Record the URL/metadata returned by the external object store.
    /// The binary itself never passes through this service.
    pub async fn create(
        &self,
        company_id: ObjectId,
        project_id: Option<ObjectId>,
        uploaded_by: ObjectId,
        name: String,
        url: String,
        mime_type: Option<String>,
        size_bytes: Option<u64>,
    ) -> DaoResult<Asset> {
        let now = DateTime::now();
        let asset = Asset {
            id: None,
            company_id,
            project_id,
            name,
            url,
            mime_type,
            size_bytes,
            uploaded_by,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&asset).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(
        &self,
        company_id: ObjectId,
        project_id: Option<ObjectId>,
    ) -> DaoResult<Vec<Asset>> {
        let mut filter = doc! { "company_id": company_id };
        if let Some(project_id) = project_id {
            filter.insert("project_id", project_id);
        }
        self.base
            .find_many(filter, Some(doc! { "created_at": -1 }))
            .await
    }

    pub async fn rename(
        &self,
        company_id: ObjectId,
        asset_id: ObjectId,
        name: String,
    ) -> DaoResult<Asset> {
        let matched = self
            .base
            .update_one(
                doc! { "_id": asset_id, "company_id": company_id },
                doc! { "$set": { "name": name } },
            )
            .await?;
        if !matched {
            return Err(DaoError::NotFound);
        }
        self.base.find_by_id_in_company(company_id, asset_id).await
    }

    pub async fn delete(&self, company_id: ObjectId, asset_id: ObjectId) -> DaoResult<()> {
        let deleted = self
            .base
            .hard_delete(doc! { "_id": asset_id, "company_id": company_id })
            .await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
