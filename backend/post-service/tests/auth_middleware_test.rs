/// HTTP-level tests for the JWT authentication middleware
///
/// Drives a minimal app through the real middleware: requests without a
/// valid bearer token never reach the handler, requests with one see the
/// resolved caller in the extractor.
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use post_service::middleware::{AuthenticatedUser, JwtAuthMiddleware};
use std::sync::Once;
use uuid::Uuid;

const TEST_SECRET: &str = "middleware-test-secret";

fn init_test_secret() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        auth_core::jwt::initialize_jwt_secret(TEST_SECRET)
            .expect("failed to initialize test JWT secret");
    });
}

async fn whoami(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "id": user.id,
        "email": user.email,
    }))
}

macro_rules! protected_app {
    () => {
        test::init_service(
            App::new().service(
                web::scope("/api/v1")
                    .wrap(JwtAuthMiddleware)
                    .route("/whoami", web::get().to(whoami)),
            ),
        )
        .await
    };
}

/// Status observed by the client, whether the middleware answered with a
/// response or short-circuited with an error.
macro_rules! observed_status {
    ($app:expr, $req:expr) => {
        match test::try_call_service(&$app, $req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.as_response_error().status_code(),
        }
    };
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    init_test_secret();
    let app = protected_app!();

    let req = test::TestRequest::get().uri("/api/v1/whoami").to_request();
    assert_eq!(observed_status!(app, req), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_garbage_token_is_unauthorized() {
    init_test_secret();
    let app = protected_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/whoami")
        .insert_header(("Authorization", "Bearer not-a-real-token"))
        .to_request();
    assert_eq!(observed_status!(app, req), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_wrong_scheme_is_unauthorized() {
    init_test_secret();
    let app = protected_app!();

    let token = auth_core::jwt::generate_access_token(Uuid::new_v4(), "eve@example.com").unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/whoami")
        .insert_header(("Authorization", format!("Basic {}", token)))
        .to_request();
    assert_eq!(observed_status!(app, req), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_valid_token_reaches_handler_with_caller_context() {
    init_test_secret();
    let app = protected_app!();

    let user_id = Uuid::new_v4();
    let token = auth_core::jwt::generate_access_token(user_id, "alice@example.com").unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/whoami")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], serde_json::json!(user_id));
    assert_eq!(body["email"], serde_json::json!("alice@example.com"));
}
