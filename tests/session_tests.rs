//! Endpoint-level tests for the session lifecycle and the
//! authorized-request protocol, run against a local mock venue.

use chrono::{Duration, Utc};
use httpmock::prelude::*;
use httpmock::Mock;
use rust_decimal_macros::dec;
use serde_json::json;

use blockex_rs::api::OrdersQuery;
use blockex_rs::models::{NewOrder, OfferType, OrderStatus, OrderType};
use blockex_rs::{BlockExClient, Credentials, Error, Method, Url};

const DENIED: &str = "Authorization has been denied for this request.";

fn client_for(server: &MockServer) -> BlockExClient {
    let credentials = Credentials::new(server.base_url(), "test-api-id", "trader", "secret")
        .expect("valid credentials");
    BlockExClient::new(credentials).expect("client builds")
}

async fn mock_login<'a>(server: &'a MockServer, token: &str, expires_in: i64) -> Mock<'a> {
    let body = json!({ "access_token": token, "expires_in": expires_in });
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .form_urlencoded_tuple("grant_type", "password");
            then.status(200).json_body(body);
        })
        .await
}

// ============================================================================
// LOGIN / LOGOUT LIFECYCLE
// ============================================================================

#[tokio::test]
async fn login_returns_token_and_tracks_expiry() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/oauth/token")
                .form_urlencoded_tuple("grant_type", "password")
                .form_urlencoded_tuple("username", "trader")
                .form_urlencoded_tuple("password", "secret")
                .form_urlencoded_tuple("client_id", "test-api-id");
            then.status(200)
                .json_body(json!({ "access_token": "token-1", "expires_in": 86399 }));
        })
        .await;
    let client = client_for(&server);

    let before = Utc::now();
    let token = client.login().await.expect("login succeeds");
    let after = Utc::now();

    assert_eq!(token, "token-1");
    login.assert_async().await;
    assert!(client.session().is_authenticated().await);

    // Expiry is issue time plus the server-supplied TTL
    let expires_at = client.session().expires_at().await.expect("expiry tracked");
    assert!(expires_at >= before + Duration::seconds(86399));
    assert!(expires_at <= after + Duration::seconds(86399));
}

#[tokio::test]
async fn login_failure_surfaces_server_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(400).json_body(json!({ "error": "invalid_client" }));
        })
        .await;
    let client = client_for(&server);

    let err = client.login().await.expect_err("login must fail");
    match err {
        Error::Authentication(message) => assert_eq!(message, "invalid_client"),
        other => panic!("expected Authentication error, got {other:?}"),
    }
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn logout_without_token_sends_nothing() {
    let server = MockServer::start_async().await;
    let logout = server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/logout");
            then.status(200);
        })
        .await;
    let client = client_for(&server);

    client.logout().await.expect("no-op logout succeeds");
    assert_eq!(logout.hits_async().await, 0);
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn logout_clears_session_and_sends_bearer() {
    let server = MockServer::start_async().await;
    mock_login(&server, "token-1", 3600).await;
    let logout = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/oauth/logout")
                .header("authorization", "Bearer token-1");
            then.status(200);
        })
        .await;
    let client = client_for(&server);

    client.login().await.expect("login succeeds");
    client.logout().await.expect("logout succeeds");

    logout.assert_async().await;
    assert!(!client.session().is_authenticated().await);
    assert!(client.session().expires_at().await.is_none());
}

#[tokio::test]
async fn rejected_logout_preserves_the_token() {
    let server = MockServer::start_async().await;
    mock_login(&server, "token-1", 3600).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/logout");
            then.status(400).json_body(json!({ "message": "cannot log out" }));
        })
        .await;
    let client = client_for(&server);

    client.login().await.expect("login succeeds");
    let err = client.logout().await.expect_err("logout must fail");
    match err {
        Error::Logout(message) => assert_eq!(message, "cannot log out"),
        other => panic!("expected Logout error, got {other:?}"),
    }

    // The caller's view stays consistent with the server's: still logged in
    assert!(client.session().is_authenticated().await);
}

// ============================================================================
// AUTHORIZED-REQUEST PROTOCOL
// ============================================================================

#[tokio::test]
async fn authorized_call_logs_in_lazily() {
    let server = MockServer::start_async().await;
    let login = mock_login(&server, "token-1", 3600).await;
    let orders = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/get")
                .header("authorization", "Bearer token-1");
            then.status(200).json_body(json!([]));
        })
        .await;
    let client = client_for(&server);

    let listed = client.orders().list(None).await.expect("list succeeds");
    assert!(listed.is_empty());
    assert_eq!(login.hits_async().await, 1);
    orders.assert_async().await;
}

#[tokio::test]
async fn expired_token_triggers_exactly_one_relogin() {
    let server = MockServer::start_async().await;
    // TTL already elapsed when stored, so the next call sees a stale token
    let mut stale_login = mock_login(&server, "stale-token", -1).await;
    let client = client_for(&server);
    client.login().await.expect("initial login succeeds");
    stale_login.delete_async().await;

    let fresh_login = mock_login(&server, "fresh-token", 3600).await;
    let instruments = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/traderinstruments")
                .header("authorization", "Bearer fresh-token");
            then.status(200).json_body(json!([]));
        })
        .await;

    let listed = client.instruments().trader().await.expect("call succeeds");
    assert!(listed.is_empty());
    assert_eq!(fresh_login.hits_async().await, 1);
    instruments.assert_async().await;
}

#[tokio::test]
async fn server_side_rejection_relogs_in_and_retries_once() {
    let server = MockServer::start_async().await;
    let mut revoked_login = mock_login(&server, "revoked-token", 3600).await;
    let client = client_for(&server);
    client.login().await.expect("initial login succeeds");
    revoked_login.delete_async().await;

    let fresh_login = mock_login(&server, "fresh-token", 3600).await;
    let rejected = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/get")
                .header("authorization", "Bearer revoked-token");
            then.status(401).json_body(json!({ "message": DENIED }));
        })
        .await;
    let accepted = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/get")
                .header("authorization", "Bearer fresh-token");
            then.status(200).json_body(json!([]));
        })
        .await;

    let listed = client.orders().list(None).await.expect("retry succeeds");
    assert!(listed.is_empty());
    assert_eq!(rejected.hits_async().await, 1);
    assert_eq!(accepted.hits_async().await, 1);
    assert_eq!(fresh_login.hits_async().await, 1);
}

#[tokio::test]
async fn second_rejection_is_returned_without_third_attempt() {
    let server = MockServer::start_async().await;
    let login = mock_login(&server, "token-1", 3600).await;
    let orders = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/orders/get");
            then.status(401).json_body(json!({ "message": DENIED }));
        })
        .await;
    let client = client_for(&server);

    let err = client.orders().list(None).await.expect_err("call must fail");
    assert!(matches!(err, Error::Api { status: 401, .. }));

    // One lazy login, one re-login; two dispatches, never a third
    assert_eq!(login.hits_async().await, 2);
    assert_eq!(orders.hits_async().await, 2);
}

#[tokio::test]
async fn non_matching_401_is_not_retried() {
    let server = MockServer::start_async().await;
    let login = mock_login(&server, "token-1", 3600).await;
    let orders = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/orders/get");
            then.status(401).json_body(json!({ "message": "Token invalid" }));
        })
        .await;
    let client = client_for(&server);
    client.login().await.expect("login succeeds");

    let err = client.orders().list(None).await.expect_err("call must fail");
    match err {
        Error::Api { status, message, .. } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Token invalid");
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    assert_eq!(orders.hits_async().await, 1);
    assert_eq!(login.hits_async().await, 1);
}

#[tokio::test]
async fn non_get_post_methods_are_rejected_before_dispatch() {
    let server = MockServer::start_async().await;
    let login = mock_login(&server, "token-1", 3600).await;
    let client = client_for(&server);

    let url = Url::parse(&format!("{}/api/orders/get", server.base_url())).unwrap();
    let err = client
        .session()
        .execute_authorized(Method::DELETE, url)
        .await
        .expect_err("method must be rejected");

    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(login.hits_async().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_share_a_single_login() {
    let server = MockServer::start_async().await;
    let login = mock_login(&server, "token-1", 3600).await;
    let instruments = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/traderinstruments")
                .header("authorization", "Bearer token-1");
            then.status(200).json_body(json!([]));
        })
        .await;
    let client = client_for(&server);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(
            async move { client.instruments().trader().await },
        ));
    }
    for handle in handles {
        let listed = handle.await.expect("task completes").expect("call succeeds");
        assert!(listed.is_empty());
    }

    // One login between all callers; every business call carried that token
    assert_eq!(login.hits_async().await, 1);
    assert_eq!(instruments.hits_async().await, 8);
}

// ============================================================================
// ENDPOINT MARSHALLING
// ============================================================================

#[tokio::test]
async fn order_filters_serialize_documented_wire_names() {
    let server = MockServer::start_async().await;
    mock_login(&server, "token-1", 3600).await;
    let orders = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/get")
                .query_param("instrumentID", "1")
                .query_param("orderType", "Limit")
                .query_param("offerType", "Bid")
                .query_param("status", "20,50")
                .query_param("loadExecutions", "true")
                .query_param("maxCount", "50");
            then.status(200).json_body(json!([{
                "orderID": "32592",
                "price": "13.40",
                "initialQuantity": "32.50",
                "quantity": "32.50",
                "dateCreated": "2017-10-09T09:32:24.735659Z",
                "offerType": 1,
                "type": 1,
                "status": 20,
                "instrumentID": 1
            }]));
        })
        .await;
    let client = client_for(&server);

    let query = OrdersQuery {
        instrument_id: Some(1),
        order_type: Some(OrderType::Limit),
        offer_type: Some(OfferType::Bid),
        status: Some(vec![OrderStatus::Placed, OrderStatus::PartiallyExecuted]),
        load_executions: Some(true),
        max_count: Some(50),
    };
    let listed = client.orders().list(Some(query)).await.expect("list succeeds");

    orders.assert_async().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].order_id, 32592);
    assert_eq!(listed[0].price, dec!(13.40));
    assert_eq!(listed[0].status, OrderStatus::Placed);
}

#[tokio::test]
async fn create_order_marshals_query_parameters() {
    let server = MockServer::start_async().await;
    mock_login(&server, "token-1", 3600).await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/orders/create")
                .header("authorization", "Bearer token-1")
                .query_param("offerType", "Bid")
                .query_param("orderType", "Limit")
                .query_param("instrumentID", "14")
                .query_param("price", "5.20")
                .query_param("quantity", "1.0");
            then.status(200);
        })
        .await;
    let client = client_for(&server);

    let order = NewOrder::limit(OfferType::Bid, 14, dec!(5.20), dec!(1.0));
    client.orders().create(&order).await.expect("create succeeds");
    create.assert_async().await;
}

#[tokio::test]
async fn cancel_failure_maps_to_api_error() {
    let server = MockServer::start_async().await;
    mock_login(&server, "token-1", 3600).await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/orders/cancel")
                .query_param("orderID", "32598");
            then.status(400).json_body(json!({ "message": "Unknown order" }));
        })
        .await;
    let client = client_for(&server);

    let err = client.orders().cancel(32598).await.expect_err("cancel must fail");
    match err {
        Error::Api { status, message, .. } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Unknown order");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn cancel_all_posts_the_instrument() {
    let server = MockServer::start_async().await;
    mock_login(&server, "token-1", 3600).await;
    let cancel_all = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/orders/cancelall")
                .query_param("instrumentID", "14");
            then.status(200);
        })
        .await;
    let client = client_for(&server);

    client.orders().cancel_all(14).await.expect("cancel all succeeds");
    cancel_all.assert_async().await;
}

#[tokio::test]
async fn market_orders_skip_authentication() {
    let server = MockServer::start_async().await;
    // No login mock: any authentication attempt would fail the test
    let market = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/getMarketOrders")
                .query_param("apiID", "test-api-id")
                .query_param("instrumentID", "1");
            then.status(200).json_body(json!([]));
        })
        .await;
    let client = client_for(&server);

    let listed = client.orders().market(1, None).await.expect("market succeeds");
    assert!(listed.is_empty());
    market.assert_async().await;
}

#[tokio::test]
async fn partner_instruments_skip_authentication() {
    let server = MockServer::start_async().await;
    let partner = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/orders/partnerinstruments")
                .query_param("apiID", "test-api-id");
            then.status(200).json_body(json!([{
                "id": 1,
                "description": "Bitcoin/Euro",
                "name": "BTC/EUR",
                "baseCurrencyID": 43,
                "quoteCurrencyID": 2,
                "minOrderAmount": "0.010",
                "commissionFeePercent": 0.02
            }]));
        })
        .await;
    let client = client_for(&server);

    let listed = client
        .instruments()
        .partner()
        .await
        .expect("partner succeeds");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "BTC/EUR");
    partner.assert_async().await;
}
