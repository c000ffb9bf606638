use bson::{DateTime, doc, oid::ObjectId};
use crewdeck_db::models::{MemberStatus, TeamMember, UserProfile};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};
use crate::identity::VerifiedIdentity;

pub struct UserProfileDao {
    pub base: BaseDao<UserProfile>,
    members: BaseDao<TeamMember>,
}

impl UserProfileDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, UserProfile::COLLECTION),
            members: BaseDao::new(db, TeamMember::COLLECTION),
        }
    }

    /// Idempotent find-or-create by the identity provider's subject id.
    ///
    /// A hit returns the profile as-is, with no hot-path mutation. On a
    /// miss a skeleton profile is created from the verified claims with
    /// `terms_accepted = false`. Two concurrent first logins for the
    /// same subject race on the unique subject_id index; the loser
    /// fetches the row that won instead of erroring.
    pub async fn find_or_create(&self, identity: &VerifiedIdentity) -> DaoResult<UserProfile> {
        if let Some(profile) = self
            .base
            .find_one(doc! { "subject_id": &identity.subject_id })
            .await?
        {
            return Ok(profile);
        }

        let now = DateTime::now();
        let profile = UserProfile {
            id: None,
            subject_id: identity.subject_id.clone(),
            email: identity.email.clone().unwrap_or_default(),
            display_name: identity.display_name.clone(),
            photo_url: identity.picture_url.clone(),
            first_name: None,
            last_name: None,
            terms_accepted: false,
            created_at: now,
            updated_at: now,
        };

        match self.base.insert_one(&profile).await {
            Ok(id) => {
                self.link_pending_membership(id, &profile.email).await?;
                self.base.find_by_id(id).await
            }
            Err(DaoError::DuplicateKey(_)) => self
                .base
                .find_one(doc! { "subject_id": &identity.subject_id })
                .await?
                .ok_or(DaoError::NotFound),
            Err(e) => Err(e),
        }
    }

    /// A membership invited under this email before the profile existed
    /// gets linked now, completing the invite-then-signup onboarding
    /// path. At most one row matches; memberships already linked to a
    /// profile are left alone.
    async fn link_pending_membership(&self, profile_id: ObjectId, email: &str) -> DaoResult<()> {
        if email.is_empty() {
            return Ok(());
        }
        self.members
            .update_one(
                doc! { "email": email, "user_id": { "$exists": false } },
                doc! {
                    "$set": {
                        "user_id": profile_id,
                        "status": bson::to_bson(&MemberStatus::Active)?,
                    }
                },
            )
            .await?;
        Ok(())
    }

    /// First-time profile completion: names plus terms acceptance.
    pub async fn complete(
        &self,
        profile_id: ObjectId,
        first_name: String,
        last_name: String,
    ) -> DaoResult<UserProfile> {
        self.base
            .update_by_id(
                profile_id,
                doc! {
                    "$set": {
                        "first_name": first_name,
                        "last_name": last_name,
                        "terms_accepted": true,
                    }
                },
            )
            .await?;
        self.base.find_by_id(profile_id).await
    }

    pub async fn update_profile(
        &self,
        profile_id: ObjectId,
        first_name: Option<String>,
        last_name: Option<String>,
        display_name: Option<String>,
        photo_url: Option<String>,
    ) -> DaoResult<UserProfile> {
        let mut update = bson::Document::new();
        if let Some(first) = first_name {
            update.insert("first_name", first);
        }
        if let Some(last) = last_name {
            update.insert("last_name", last);
        }
        if let Some(name) = display_name {
            update.insert("display_name", name);
        }
        if let Some(photo) = photo_url {
            update.insert("photo_url", photo);
        }

        if !update.is_empty() {
            self.base
                .update_by_id(profile_id, doc! { "$set": update })
                .await?;
        }
        self.base.find_by_id(profile_id).await
    }

    pub async fn delete(&self, profile_id: ObjectId) -> DaoResult<()> {
        let deleted = self.base.hard_delete(doc! { "_id": profile_id }).await?;
        if deleted == 0 {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
