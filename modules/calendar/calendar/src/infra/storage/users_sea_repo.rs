use async_trait::async_trait;
use calendar_sdk::User;
use sea_orm::{
    ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait,
    sea_query::OnConflict,
};
use tracing::info;
use uuid::Uuid;

use super::db_err;
use super::entity::user::{self, Entity as UserEntity};
use super::mapper::user_to_active_model;
use crate::domain::error::DomainError;
use crate::domain::repo::UserDirectory;

pub struct SeaOrmUserDirectory {
    db: DatabaseConnection,
}

impl SeaOrmUserDirectory {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert or refresh the configured users. Existing rows keep their id;
    /// login and timezone are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` on any database failure, including a
    /// login already taken by a different id.
    pub async fn seed(&self, users: &[User]) -> Result<(), DomainError> {
        for u in users {
            UserEntity::insert(user_to_active_model(u))
                .on_conflict(
                    OnConflict::column(user::Column::Id)
                        .update_columns([user::Column::Login, user::Column::Timezone])
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await
                .map_err(db_err)?;
        }
        if !users.is_empty() {
            info!(count = users.len(), "Seeded calendar users");
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for SeaOrmUserDirectory {
    async fn find(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let found = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn update_timezone(&self, id: Uuid, timezone: &str) -> Result<User, DomainError> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found(id))?;

        let active = user::ActiveModel {
            id: ActiveValue::Unchanged(existing.id),
            login: ActiveValue::Unchanged(existing.login),
            timezone: ActiveValue::Set(timezone.to_owned()),
        };
        let model = active.update(&self.db).await.map_err(db_err)?;
        Ok(model.into())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        UserEntity::find().count(&self.db).await.map_err(db_err)
    }
}
