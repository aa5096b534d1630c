//! Refresh token repository.
//!
//! Tokens are single use: `consume` deletes the row whether or not it
//! has expired.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::refresh_token;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A refresh token that was successfully consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
}

impl RefreshGrant {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn store(&self, user_id: i32, token: String, expires_at: DateTime<Utc>)
        -> AppResult<()>;

    /// Remove the token and return what it granted, if it existed.
    async fn consume(&self, token: &str) -> AppResult<Option<RefreshGrant>>;
}

pub struct TokenStore {
    db: DatabaseConnection,
}

impl TokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenRepository for TokenStore {
    async fn store(
        &self,
        user_id: i32,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        refresh_token::ActiveModel {
            user_id: Set(user_id),
            token: Set(token),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(())
    }

    async fn consume(&self, token: &str) -> AppResult<Option<RefreshGrant>> {
        let Some(model) = refresh_token::Entity::find()
            .filter(refresh_token::Column::Token.eq(token))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let deleted = refresh_token::Entity::delete_by_id(model.id)
            .exec(&self.db)
            .await?;

        // Another request consumed it first
        if deleted.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(RefreshGrant {
            user_id: model.user_id,
            expires_at: model.expires_at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_grant_expiry() {
        let now = Utc::now();
        let grant = RefreshGrant {
            user_id: 1,
            expires_at: now + Duration::days(1),
        };
        assert!(!grant.is_expired(now));
        assert!(grant.is_expired(now + Duration::days(2)));
    }
}
