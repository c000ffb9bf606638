use bson::{DateTime, doc, oid::ObjectId};
use crewdeck_db::models::Client;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct ClientDao {
    pub base: BaseDao<Client>,
}

impl ClientDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Client::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        company_id: ObjectId,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        company_name: Option<String>,
    ) -> DaoResult<Client> {
        let now = DateTime::now();
        let client = Client {
            id: None,
            company_id,
            name,
            email,
            phone,
            company_name,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&client).await?;
        self.base.find_by_id(id).await
    }

    pub async fn list(&self, company_id: ObjectId) -> DaoResult<Vec<Client>> {
        self.base
            .find_many(doc! { "company_id": company_id }, Some(doc! { "name": 1 }))
            .await
    }

    pub async fn update(
        &self,
        company_id: ObjectId,
        client_id: ObjectId,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        company_name: Option<String>,
    ) -> DaoResult<Client> {
        let mut update = bson::Document::new();
        if let Some(name) = name {
            update.insert("name", name);
        }
        if let Some(email) = email {
            update.insert("email", email);
        }
        if let Some(phone) = phone {
            update.insert("phone", phone);
        }
        if let Some(company_name) = company_name {
            update.insert("company_name", company_name);
        }

        if !update.is_empty() {
            let matched = self
                .base
                .update_one(
                    doc! { "_id": client_id, "company_id": company_id },
                    doc! { "$set": update },
                )
                .await?;
            if !matched {
                return Err(DaoError::NotFound);
            }
        }
        self.base.find_by_id_in_company(company_id, client_id).await
    }

    pub async fn delete(&self, company_id: ObjectId, client_id: ObjectId) -> DaoResult<()> {
        let deleted = self
            .base
            .hard_delete(doc! { "_id": client_id, "company_id": company_id })
            .await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
