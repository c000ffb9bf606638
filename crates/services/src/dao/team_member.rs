use bson::{DateTime, doc, oid::ObjectId};
use crewdeck_db::models::{Access, MemberStatus, TeamMember, UserProfile};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct TeamMemberDao {
    pub base: BaseDao<TeamMember>,
    profiles: BaseDao<UserProfile>,
}

impl TeamMemberDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, TeamMember::COLLECTION),
            profiles: BaseDao::new(db, UserProfile::COLLECTION),
        }
    }

    /// Resolve the membership that grants a user their tenant context.
    ///
    /// The unique sparse user_id index guarantees at most one row;
    /// None means the user is not provisioned for any tenant and must
    /// go through company creation or an invite.
    pub async fn find_for_user(&self, user_id: ObjectId) -> DaoResult<Option<TeamMember>> {
        self.base.find_one(doc! { "user_id": user_id }).await
    }

    /// Login-timestamp bookkeeping. Callers fire-and-forget this; it
    /// must never block or fail a request.
    pub async fn touch_last_login(&self, member_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(member_id, doc! { "$set": { "last_login": DateTime::now() } })
            .await
    }

    /// Detach a deleted profile from its membership. The roster entry
    /// survives as a pending invite, so the same email can be linked
    /// again on a later signup without tripping the unique
    /// (company_id, email) index.
    pub async fn unlink_user(&self, user_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "user_id": user_id },
                doc! {
                    "$unset": { "user_id": "" },
                    "$set": { "status": bson::to_bson(&MemberStatus::Invited)?, "last_login": bson::Bson::Null },
                },
            )
            .await
    }

    pub async fn list(&self, company_id: ObjectId) -> DaoResult<Vec<TeamMember>> {
        self.base
            .find_many(
                doc! { "company_id": company_id },
                Some(doc! { "created_at": 1 }),
            )
            .await
    }

    /// Invite a member by email. If a profile with that email already
    /// exists the membership is linked to it immediately, which is what
    /// lets task enrichment hydrate the member's display fields.
    pub async fn invite(
        &self,
        company_id: ObjectId,
        email: String,
        role: String,
        access: Access,
    ) -> DaoResult<TeamMember> {
        let linked = self.profiles.find_one(doc! { "email": &email }).await?;
        let (user_id, status) = match &linked {
            Some(profile) => (profile.id, MemberStatus::Active),
            None => (None, MemberStatus::Invited),
        };

        let now = DateTime::now();
        let member = TeamMember {
            id: None,
            user_id,
            company_id,
            email,
            role,
            access,
            status,
            avatar: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&member).await?;
        self.base.find_by_id(id).await
    }

    pub async fn update(
        &self,
        company_id: ObjectId,
        member_id: ObjectId,
        role: Option<String>,
        access: Option<Access>,
        status: Option<MemberStatus>,
    ) -> DaoResult<TeamMember> {
        let mut update = bson::Document::new();
        if let Some(role) = role {
            update.insert("role", role);
        }
        if let Some(access) = access {
            update.insert("access", bson::to_bson(&access)?);
        }
        if let Some(status) = status {
            update.insert("status", bson::to_bson(&status)?);
        }

        if !update.is_empty() {
            let matched = self
                .base
                .update_one(
                    doc! { "_id": member_id, "company_id": company_id },
                    doc! { "$set": update },
                )
                .await?;
            if !matched {
                return Err(DaoError::NotFound);
            }
        }
        self.base.find_by_id_in_company(company_id, member_id).await
    }

    pub async fn delete(&self, company_id: ObjectId, member_id: ObjectId) -> DaoResult<()> {
        let deleted = self
            .base
            .hard_delete(doc! { "_id": member_id, "company_id": company_id })
            .await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
