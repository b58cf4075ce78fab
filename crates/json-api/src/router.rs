//! App Router

use salvo::Router;

use crate::{auth, checkout, healthcheck, observability, orders, payments, products};

/// Public storefront routes followed by admin routes behind bearer auth.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(public_router())
        .push(admin_router())
}

fn public_router() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(Router::with_path("checkout/summary").post(checkout::summary::handler))
        .push(
            Router::with_path("payments")
                .push(Router::with_path("initiate").post(payments::initiate::handler))
                .push(Router::with_path("callback").post(payments::callback::handler)),
        )
        .push(Router::with_path("orders").post(orders::create::handler))
}

fn admin_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(Router::with_path("{product}").delete(products::delete::handler)),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use duka_app::{auth::AuthServiceError, domain::products::records::ProductUuid};

    use crate::{products::tests::make_product, test_helpers::Mocks};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .push(app_router()),
        )
    }

    #[tokio::test]
    async fn test_product_listing_is_public() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.auth.expect_authenticate_bearer().never();
        mocks
            .products
            .expect_list_products()
            .once()
            .return_once(|_| Ok(vec![make_product(ProductUuid::new(), "beadwork", 1200)]));

        let res = TestClient::get("http://example.com/products")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_product_creation_requires_token() {
        let mut mocks = Mocks::default();

        mocks.products.expect_create_product().never();

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Kikoi", "category": "textiles", "price": 100 }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_order_listing_rejects_unknown_token() {
        let mut mocks = Mocks::default();

        mocks
            .auth
            .expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::NotFound));
        mocks.orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders")
            .bearer_auth("dk_unknown")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_healthcheck_is_routed() -> TestResult {
        let body = TestClient::get("http://example.com/healthcheck")
            .send(&make_service(Mocks::default()))
            .await
            .take_string()
            .await?;

        assert!(body.contains("ok"), "expected ok status, got {body}");

        Ok(())
    }
}
