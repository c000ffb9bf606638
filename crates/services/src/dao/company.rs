use bson::{DateTime, doc, oid::ObjectId};
use crewdeck_db::models::{Access, Company, MemberStatus, TeamMember, UserProfile};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct CompanyDao {
    pub base: BaseDao<Company>,
    pub members: BaseDao<TeamMember>,
}

impl CompanyDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Company::COLLECTION),
            members: BaseDao::new(db, TeamMember::COLLECTION),
        }
    }

    /// Create a company and bootstrap the owner's superAdmin membership.
    ///
    /// A user with an existing membership cannot create another tenant;
    /// the unique sparse user_id index backs this up at the store level.
    /// If the membership insert fails the company row is rolled back so
    /// no ownerless tenant is left behind.
    pub async fn create(&self, name: String, owner: &UserProfile) -> DaoResult<Company> {
        let owner_id = owner.id.ok_or(DaoError::NotFound)?;

        let existing = self
            .members
            .count(doc! { "user_id": owner_id })
            .await?;
        if existing > 0 {
            return Err(DaoError::DuplicateKey(
                "user already provisioned for a tenant".to_string(),
            ));
        }

        let now = DateTime::now();
        let company = Company {
            id: None,
            name,
            owner_profile_id: owner_id,
            created_at: now,
            updated_at: now,
        };

        let company_id = self.base.insert_one(&company).await?;

        let member = TeamMember {
            id: None,
            user_id: Some(owner_id),
            company_id,
            email: owner.email.clone(),
            role: "owner".to_string(),
            access: Access::SuperAdmin,
            status: MemberStatus::Active,
            avatar: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.members.insert_one(&member).await {
            let _ = self.base.hard_delete(doc! { "_id": company_id }).await;
            return Err(e);
        }

        self.base.find_by_id(company_id).await
    }

    pub async fn find(&self, company_id: ObjectId) -> DaoResult<Company> {
        self.base.find_by_id(company_id).await
    }
}
