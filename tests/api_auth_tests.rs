//! 认证 API 集成测试

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::json;
use survey_service::repository::CredentialStore;
use tower::ServiceExt;

mod common;
use common::{create_test_app_state, create_test_user};

fn login_request(username: &str, password: &str) -> Request<Body> {
    let form = format!(
        "username={}&password={}",
        username.replace('@', "%40"),
        password
    );

    Request::builder()
        .method("POST")
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

fn me_request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/me");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

fn register_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let response = app.clone().oneshot(login_request(username, password)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_login_success() {
    let (state, store) = create_test_app_state();
    create_test_user(&store, "test@example.com", "TestPass123").await;
    let app = survey_service::routes::create_router(state);

    let response = app
        .oneshot(login_request("test@example.com", "TestPass123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["token_type"], "bearer");
    assert_eq!(json["expires_in"], 1800);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (state, store) = create_test_app_state();
    create_test_user(&store, "test@example.com", "TestPass123").await;
    let app = survey_service::routes::create_router(state);

    let response = app
        .oneshot(login_request("test@example.com", "WrongPassword1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert!(json.get("access_token").is_none());
    assert_eq!(json["error"]["message"], "Incorrect username or password");
}

#[tokio::test]
async fn test_login_unknown_user_matches_wrong_password() {
    let (state, store) = create_test_app_state();
    create_test_user(&store, "test@example.com", "TestPass123").await;
    let app = survey_service::routes::create_router(state);

    let wrong = app
        .clone()
        .oneshot(login_request("test@example.com", "WrongPassword1"))
        .await
        .unwrap();
    let unknown = app
        .oneshot(login_request("nobody@example.com", "TestPass123"))
        .await
        .unwrap();

    assert_eq!(wrong.status(), unknown.status());
    assert_eq!(
        body_json(wrong).await["error"]["message"],
        body_json(unknown).await["error"]["message"]
    );
}

#[tokio::test]
async fn test_me_with_valid_token() {
    let (state, store) = create_test_app_state();
    let user_id = create_test_user(&store, "test@example.com", "TestPass123").await;
    let app = survey_service::routes::create_router(state);

    let token = login_token(&app, "test@example.com", "TestPass123").await;

    let response = app
        .oneshot(me_request(Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["user_id"], user_id);
    assert_eq!(json["email"], "test@example.com");
    assert_eq!(json["education"], "Bachelor");
    assert_eq!(json["gender"], "male");
    assert_eq!(json["age"], "21-25");
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_me_rejections_are_uniform() {
    let (state, _store) = create_test_app_state();
    let unknown_subject = state.jwt_service.issue_for_subject("999").unwrap();
    let app = survey_service::routes::create_router(state);

    let cases = [
        None,
        Some("Bearer garbage-string".to_string()),
        Some("Basic dGVzdDp0ZXN0".to_string()),
        Some(format!("Bearer {}", unknown_subject)),
    ];

    for authorization in cases {
        let response = app
            .clone()
            .oneshot(me_request(authorization.as_deref()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{authorization:?}");
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Could not validate credentials");
    }
}

#[tokio::test]
async fn test_me_after_account_deactivated() {
    let (state, store) = create_test_app_state();
    let user_id = create_test_user(&store, "test@example.com", "TestPass123").await;
    let app = survey_service::routes::create_router(state);

    let token = login_token(&app, "test@example.com", "TestPass123").await;
    store.set_active(user_id, false).await;

    let response = app
        .oneshot(me_request(Some(&format!("Bearer {}", token))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_then_login() {
    let (state, _store) = create_test_app_state();
    let app = survey_service::routes::create_router(state);

    let body = json!({
        "full_name": "Asha Rao",
        "email": "asha@example.com",
        "password": "Secret123",
        "gender": "female",
        "age": "26-30",
        "education": "Master",
        "income_bracket": "50k-75k",
        "phone_number": "5550100"
    });

    let response = app.clone().oneshot(register_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["msg"], "User registered successfully");
    assert_eq!(json["user_id"], 1);

    let token = login_token(&app, "asha@example.com", "Secret123").await;

    let response = app
        .oneshot(me_request(Some(&format!("Bearer {}", token))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["gender"], "female");
    assert_eq!(json["age"], "26-30");
    assert_eq!(json["phone_number"], "5550100");
    assert_eq!(json["income_bracket"], "50k-75k");
}

#[tokio::test]
async fn test_register_rejects_unlisted_gender_or_age() {
    let (state, store) = create_test_app_state();
    let app = survey_service::routes::create_router(state);

    let valid = json!({
        "full_name": "Asha Rao",
        "email": "asha@example.com",
        "password": "Secret123",
        "gender": "male",
        "age": "41-50"
    });

    for (field, value) in [("gender", "robot"), ("age", "12-14"), ("age", "100")] {
        let mut body = valid.clone();
        body[field] = json!(value);

        let response = app.clone().oneshot(register_request(&body)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "{field}={value}"
        );
    }

    // 必填字段缺失同样被拒绝
    let mut missing_gender = valid.clone();
    missing_gender.as_object_mut().unwrap().remove("gender");
    let response = app.clone().oneshot(register_request(&missing_gender)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert!(store.find_by_identifier("asha@example.com").await.unwrap().is_none());

    let response = app.oneshot(register_request(&valid)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (state, store) = create_test_app_state();
    create_test_user(&store, "dup@example.com", "TestPass123").await;
    let app = survey_service::routes::create_router(state);

    let body = json!({
        "full_name": "Someone Else",
        "email": "dup@example.com",
        "password": "Another123",
        "gender": "other",
        "age": "61-70"
    });

    let response = app.oneshot(register_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "Email already registered");
}

#[tokio::test]
async fn test_response_carries_trace_headers() {
    let (state, _store) = create_test_app_state();
    let app = survey_service::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-trace-id", "trace-abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-trace-id").unwrap(), "trace-abc");
    assert!(response.headers().get("x-request-id").is_some());
}
