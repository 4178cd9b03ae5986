use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, Set};

use crate::errors::ModelError;

#[derive(Clone, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub pass_hash: String,
    pub is_admin: bool,
    pub created_at: DateTimeWithTimeZone,
}

// Hand-written so the password hash never ends up in logs.
impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("users::Model")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Insert a user; a taken email surfaces as [`ModelError::Conflict`] straight
/// from the unique index, so no read-before-write is needed.
pub async fn create(db: &DatabaseConnection, email: &str, pass_hash: &str) -> Result<Model, ModelError> {
    if email.trim().is_empty() { return Err(ModelError::Validation("email required".into())); }
    if pass_hash.is_empty() { return Err(ModelError::Validation("password hash required".into())); }
    let am = ActiveModel {
        id: NotSet,
        email: Set(email.to_string()),
        pass_hash: Set(pass_hash.to_string()),
        is_admin: Set(false),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Flip the admin flag. Only administrative tooling calls this.
pub async fn set_admin(db: &DatabaseConnection, id: i64, is_admin: bool) -> Result<Model, ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("user {id}")))?
        .into();
    found.is_admin = Set(is_admin);
    Ok(found.update(db).await?)
}
