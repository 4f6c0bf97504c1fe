use sea_orm::entity::prelude::*;

/// One license record per activation code.
///
/// `device_id` is null until the first successful activation claims the code;
/// once set it never changes outside of administrative intervention.
/// `expires_at` is null for full licenses (never expires) and for trials that
/// have not been activated yet.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "licenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    /// Access tier: "trial", "full" or "dev".
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub device_id: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub activated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub email: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
