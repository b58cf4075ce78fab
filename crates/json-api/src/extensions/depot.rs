//! Depot helper extensions.

use std::any::Any;

use duka_app::auth::AdminPrincipal;
use salvo::prelude::{Depot, StatusError};

const ADMIN_DEPOT_KEY: &str = "admin_principal";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_admin(&mut self, admin: AdminPrincipal);

    fn admin_or_401(&self) -> Result<&AdminPrincipal, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_admin(&mut self, admin: AdminPrincipal) {
        self.insert(ADMIN_DEPOT_KEY, admin);
    }

    fn admin_or_401(&self) -> Result<&AdminPrincipal, StatusError> {
        self.get::<AdminPrincipal>(ADMIN_DEPOT_KEY)
            .map_err(|_missing| StatusError::unauthorized())
    }
}
