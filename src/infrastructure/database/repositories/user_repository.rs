use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, User, UserRepository, UserRole};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Moderator => UserRole::Moderator,
        user::UserRole::User => UserRole::User,
    }
}

fn user_model_to_domain(model: user::Model) -> DomainResult<User> {
    let id = Uuid::parse_str(&model.id).map_err(|e| {
        DomainError::Storage(format!("stored user id '{}' is not a UUID: {}", model.id, e))
    })?;

    Ok(User {
        id,
        email: model.email,
        password_hash: model.password_hash,
        user_status: model.user_status,
        user_role: entity_role_to_domain(model.user_role),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(user_model_to_domain).collect()
    }

    async fn get_user(&self, id: Uuid) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;

        model.map(user_model_to_domain).transpose()
    }

    async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }

        Ok(())
    }
}
