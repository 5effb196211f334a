use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, sea_query::OnConflict};
use uuid::Uuid;

use crate::entities::{prelude::*, profiles};
use dexdle_types::{Profile, User};

pub struct ProfileRepository {
    db: DatabaseConnection,
}

impl ProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_profile(model: profiles::Model) -> Profile {
        Profile {
            id: model.id,
            display_name: model.display_name,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        let profile = Profiles::find_by_id(id).one(&self.db).await?;
        Ok(profile.map(Self::model_to_profile))
    }

    /// Create the profile on first sight of a user, otherwise refresh the
    /// display name from the latest token.
    pub async fn upsert_profile(&self, user: &User) -> Result<Profile> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let profile = profiles::ActiveModel {
            id: sea_orm::ActiveValue::Set(user.id),
            display_name: sea_orm::ActiveValue::Set(user.display_name.clone()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
        };

        Profiles::insert(profile)
            .on_conflict(
                OnConflict::column(profiles::Column::Id)
                    .update_columns([profiles::Column::DisplayName, profiles::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve profile after upsert"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> ProfileRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        ProfileRepository::new(db)
    }

    fn test_user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", name.to_lowercase()),
            display_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_profile() {
        let repo = setup_test_db().await;
        let user = test_user("Ash");

        let profile = repo.upsert_profile(&user).await.unwrap();
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.display_name, "Ash");
        assert_eq!(profile.updated_at, profile.created_at);

        let found = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found, profile);
    }

    #[tokio::test]
    async fn test_upsert_refreshes_display_name() {
        let repo = setup_test_db().await;
        let mut user = test_user("Ash");
        let first = repo.upsert_profile(&user).await.unwrap();

        user.display_name = "Ash Ketchum".to_string();
        let second = repo.upsert_profile(&user).await.unwrap();
        assert_eq!(second.display_name, "Ash Ketchum");
        assert_eq!(second.created_at, first.created_at);

        let refreshed = chrono::DateTime::parse_from_rfc3339(&second.updated_at).unwrap();
        let created = chrono::DateTime::parse_from_rfc3339(&second.created_at).unwrap();
        assert!(refreshed >= created);
    }

    #[tokio::test]
    async fn test_unknown_profile() {
        let repo = setup_test_db().await;
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}
