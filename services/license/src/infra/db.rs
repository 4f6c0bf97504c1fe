use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    SqlErr, sea_query::Expr,
};
use uuid::Uuid;

use taskwheel_license_schema::licenses;

use crate::domain::repository::LicenseRepository;
use crate::domain::types::{LicenseRecord, LicenseType};
use crate::error::LicenseServiceError;

#[derive(Clone)]
pub struct DbLicenseRepository {
    pub db: DatabaseConnection,
}

impl LicenseRepository for DbLicenseRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<LicenseRecord>, LicenseServiceError> {
        let model = licenses::Entity::find()
            .filter(licenses::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find license by code")?;
        model.map(license_from_model).transpose()
    }

    async fn find_trial_by_device(
        &self,
        device_id: &str,
    ) -> Result<Option<LicenseRecord>, LicenseServiceError> {
        let model = licenses::Entity::find()
            .filter(licenses::Column::DeviceId.eq(device_id))
            .filter(licenses::Column::Kind.eq(LicenseType::Trial.as_str()))
            .one(&self.db)
            .await
            .context("find trial by device")?;
        model.map(license_from_model).transpose()
    }

    async fn claim_device(
        &self,
        id: Uuid,
        device_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, LicenseServiceError> {
        // Single conditional update: only an unclaimed record can be won, so
        // concurrent first activations cannot both succeed.
        let result = licenses::Entity::update_many()
            .col_expr(licenses::Column::DeviceId, Expr::value(device_id))
            .col_expr(licenses::Column::ActivatedAt, Expr::value(now))
            .filter(licenses::Column::Id.eq(id))
            .filter(licenses::Column::DeviceId.is_null())
            .exec(&self.db)
            .await
            .context("claim device")?;
        Ok(result.rows_affected > 0)
    }

    async fn stamp_trial_expiry(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, LicenseServiceError> {
        let result = licenses::Entity::update_many()
            .col_expr(licenses::Column::ExpiresAt, Expr::value(expires_at))
            .filter(licenses::Column::Id.eq(id))
            .filter(licenses::Column::ExpiresAt.is_null())
            .exec(&self.db)
            .await
            .context("stamp trial expiry")?;
        Ok(result.rows_affected > 0)
    }

    async fn insert(&self, record: &LicenseRecord) -> Result<(), LicenseServiceError> {
        let active = licenses::ActiveModel {
            id: Set(record.id),
            code: Set(record.code.clone()),
            kind: Set(record.kind.as_str().to_owned()),
            device_id: Set(record.device_id.clone()),
            expires_at: Set(record.expires_at),
            activated_at: Set(record.activated_at),
            email: Set(record.email.clone()),
            created_at: Set(record.created_at),
        };
        match active.insert(&self.db).await {
            Ok(_) => Ok(()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(LicenseServiceError::DuplicateCode)
                }
                _ => Err(anyhow::Error::new(e).context("insert license").into()),
            },
        }
    }
}

fn license_from_model(model: licenses::Model) -> Result<LicenseRecord, LicenseServiceError> {
    let kind = LicenseType::parse(&model.kind)
        .with_context(|| format!("unknown license type {:?}", model.kind))?;
    Ok(LicenseRecord {
        id: model.id,
        code: model.code,
        kind,
        device_id: model.device_id,
        expires_at: model.expires_at,
        activated_at: model.activated_at,
        email: model.email,
        created_at: model.created_at,
    })
}
