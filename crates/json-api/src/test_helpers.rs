//! Test helpers.

use std::sync::Arc;

use duka_app::{
    auth::{AdminPrincipal, AdminTokenUuid, MockAuthService},
    context::AppContext,
    domain::{
        categories::MockCategoriesService,
        orders::MockOrdersService,
        payments::{MockPaymentSweepService, MockPaymentsService},
        products::MockProductsService,
    },
};
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_ADMIN_TOKEN: AdminTokenUuid = AdminTokenUuid::from_uuid(Uuid::nil());

/// Stand-in for the auth middleware on admin routes.
#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_admin(AdminPrincipal {
        token: TEST_ADMIN_TOKEN,
        name: "test admin".to_string(),
    });

    ctrl.call_next(req, depot, res).await;
}

/// Services that fail the test when called; tests replace the one under test.
pub(crate) struct Mocks {
    pub products: MockProductsService,
    pub categories: MockCategoriesService,
    pub orders: MockOrdersService,
    pub payments: MockPaymentsService,
    pub payment_sweep: MockPaymentSweepService,
    pub auth: MockAuthService,
}

impl Default for Mocks {
    fn default() -> Self {
        Self {
            products: MockProductsService::new(),
            categories: MockCategoriesService::new(),
            orders: MockOrdersService::new(),
            payments: MockPaymentsService::new(),
            payment_sweep: MockPaymentSweepService::new(),
            auth: MockAuthService::new(),
        }
    }
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            categories: Arc::new(self.categories),
            orders: Arc::new(self.orders),
            payments: Arc::new(self.payments),
            payment_sweep: Arc::new(self.payment_sweep),
            auth: Arc::new(self.auth),
        })
    }

    /// Serve `route` as a public endpoint.
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }

    /// Serve `route` as an endpoint behind admin authentication.
    pub(crate) fn admin_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_admin)
                .push(route),
        )
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth,
        ..Mocks::default()
    }
    .into_state()
}

/// A database failure as the services report it.
pub(crate) fn storage_error() -> sqlx::Error {
    sqlx::Error::PoolTimedOut
}
