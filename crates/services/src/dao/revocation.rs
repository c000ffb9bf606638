use bson::{DateTime, doc};
use crewdeck_db::models::RevokedCredential;
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct RevocationDao {
    pub base: BaseDao<RevokedCredential>,
}

impl RevocationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, RevokedCredential::COLLECTION),
        }
    }

    /// Revoke a credential by its jti. Revoking twice is a no-op.
    pub async fn revoke(&self, jti: &str, expires_at_unix_secs: i64) -> DaoResult<()> {
        let row = RevokedCredential {
            id: None,
            jti: jti.to_string(),
            expires_at: DateTime::from_millis(expires_at_unix_secs * 1000),
            revoked_at: DateTime::now(),
        };
        match self.base.insert_one(&row).await {
            Ok(_) | Err(DaoError::DuplicateKey(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn is_revoked(&self, jti: &str) -> DaoResult<bool> {
        let count = self.base.count(doc! { "jti": jti }).await?;
        Ok(count > 0)
    }
}
