use sea_orm::DatabaseConnection;

use crate::infra::authority::HttpLicenseAuthority;
use crate::infra::db::DbLicenseRepository;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub authority: HttpLicenseAuthority,
}

impl AppState {
    pub fn license_repo(&self) -> DbLicenseRepository {
        DbLicenseRepository {
            db: self.db.clone(),
        }
    }

    pub fn authority(&self) -> HttpLicenseAuthority {
        self.authority.clone()
    }
}
