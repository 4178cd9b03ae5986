use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use tracing::debug;

use crate::errors::ModelError;

#[derive(Clone, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "apps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub secret: String,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("apps::Model")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Insert the app or replace its name and secret when the id already exists.
pub async fn upsert(db: &DatabaseConnection, id: i32, name: &str, secret: &str) -> Result<Model, ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("app name required".into())); }
    if secret.is_empty() { return Err(ModelError::Validation("app secret required".into())); }
    if let Some(existing) = Entity::find_by_id(id).one(db).await? {
        let mut am: ActiveModel = existing.into();
        am.name = Set(name.to_string());
        am.secret = Set(secret.to_string());
        debug!(app_id = id, "updating app");
        Ok(am.update(db).await?)
    } else {
        let am = ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            secret: Set(secret.to_string()),
        };
        debug!(app_id = id, "inserting app");
        Ok(am.insert(db).await?)
    }
}
