#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use neurovia_api::{
    config::{Config, EventSettings, StoreBackend},
    create_router,
    middlewares::auth::{JwtClaims, JwtService},
    models::catalog::{Component, ComponentCategory, ComponentType, QuizQuestion},
    services::{
        memory_store::{MemoryCatalog, MemoryTeamStore},
        AppState,
    },
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret";

/// The six components a team buys in the happy path, in flow order (total 1850)
pub const FLOW_COMPONENTS: [&str; 6] = [
    "cmp-sensor",
    "cmp-signal",
    "cmp-controller",
    "cmp-comm",
    "cmp-cloud",
    "cmp-actuator",
];

pub fn test_config() -> Config {
    Config {
        mongo_uri: "mongodb://unused".to_string(),
        mongo_database: "neurovia_test".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        store_backend: StoreBackend::Memory,
        seed_catalog: concat!(env!("CARGO_MANIFEST_DIR"), "/config/seed_catalog.json").to_string(),
        event: EventSettings::default(),
    }
}

pub fn create_test_app() -> Router {
    create_test_app_with(test_config())
}

pub fn create_test_app_with(config: Config) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let state = AppState::with_stores(
        config,
        Arc::new(MemoryTeamStore::new()),
        Arc::new(MemoryCatalog::new(components(), questions())),
    );
    create_router(Arc::new(state))
}

/// Router over the memory backend exactly as `STORE_BACKEND=memory` starts it
pub fn create_seeded_app() -> Router {
    let state = AppState::in_memory(test_config()).expect("seed catalog loads");
    create_router(Arc::new(state))
}

fn component(id: &str, component_type: ComponentType, price: i64, available: bool) -> Component {
    Component {
        id: id.to_string(),
        name: format!("{} module", component_type),
        component_type,
        icon: "🔌".to_string(),
        description: String::new(),
        price,
        specifications: HashMap::new(),
        is_available: available,
        category: ComponentCategory::Essential,
    }
}

pub fn components() -> Vec<Component> {
    vec![
        component("cmp-sensor", ComponentType::Sensor, 300, true),
        component("cmp-signal", ComponentType::Signal, 150, true),
        component("cmp-controller", ComponentType::Controller, 400, true),
        component("cmp-comm", ComponentType::Communication, 250, true),
        component("cmp-cloud", ComponentType::Cloud, 350, true),
        component("cmp-actuator", ComponentType::Actuator, 400, true),
        component("cmp-premium", ComponentType::Cloud, 1500, true),
        component("cmp-retired", ComponentType::Sensor, 100, false),
    ]
}

/// 13 active questions (one more than a quiz delivers) plus one inactive.
/// The question at quiz position `p` has correct answer `p % 4`.
pub fn questions() -> Vec<QuizQuestion> {
    let mut questions: Vec<QuizQuestion> = (0..13)
        .map(|p| question(&format!("q{:02}", p + 1), p % 4, true))
        .collect();
    questions.push(question("q00", 0, false));
    questions
}

fn question(id: &str, correct_answer: i32, active: bool) -> QuizQuestion {
    serde_json::from_value(json!({
        "_id": id,
        "question": format!("Question {}", id),
        "options": ["A", "B", "C", "D"],
        "correctAnswer": correct_answer,
        "isActive": active
    }))
    .unwrap()
}

/// Answers for a 12-question quiz with exactly `correct` right answers
pub fn quiz_answers(correct: usize) -> Vec<i32> {
    (0..12)
        .map(|p| if p < correct { p as i32 % 4 } else { (p as i32 + 1) % 4 })
        .collect()
}

pub fn token(role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    JwtService::new(TEST_SECRET)
        .generate_token(JwtClaims {
            sub: format!("{}-1", role),
            role: role.to_string(),
            exp: (now + 3600) as usize,
            iat: now as usize,
        })
        .unwrap()
}

pub fn admin_token() -> String {
    token("admin")
}

pub fn super_admin_token() -> String {
    token("super_admin")
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn register_team(app: &Router, team_name: &str) -> String {
    let (status, body) = post(
        app,
        "/api/teams/register",
        json!({
            "teamName": team_name,
            "members": [
                { "name": "Grace Hopper", "email": "grace@example.com" },
                { "name": "Alan Turing", "email": "alan@example.com" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["teamId"].as_str().unwrap().to_string()
}

pub async fn submit_quiz(app: &Router, team_id: &str, correct: usize) -> Value {
    let (status, body) = post(
        app,
        "/api/round1/quiz/submit",
        json!({ "teamId": team_id, "answers": quiz_answers(correct) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "quiz failed: {body}");
    body
}

pub async fn purchase(app: &Router, team_id: &str, component_ids: &[&str]) -> (StatusCode, Value) {
    post(
        app,
        "/api/round1/purchase",
        json!({ "teamId": team_id, "componentIds": component_ids }),
    )
    .await
}

/// Quiz with `correct` right answers, then buys the six flow components
pub async fn complete_round1(app: &Router, team_id: &str, correct: usize) {
    submit_quiz(app, team_id, correct).await;
    let (status, body) = purchase(app, team_id, &FLOW_COMPONENTS).await;
    assert_eq!(status, StatusCode::OK, "purchase failed: {body}");
}

/// Submits a schematic with the given component types, `null` for empty slots
pub async fn submit_schematic(
    app: &Router,
    team_id: &str,
    types: &[Option<&str>],
    time_taken: u32,
) -> (StatusCode, Value) {
    let schematic: Vec<Value> = types
        .iter()
        .map(|t| match t {
            Some(t) => json!({ "componentType": t }),
            None => Value::Null,
        })
        .collect();
    post(
        app,
        "/api/round2/submit",
        json!({ "teamId": team_id, "schematic": schematic, "timeTaken": time_taken }),
    )
    .await
}

pub async fn complete_round2(app: &Router, team_id: &str) {
    let (status, body) = submit_schematic(
        app,
        team_id,
        &[
            Some("sensor"),
            Some("signal"),
            Some("controller"),
            Some("communication"),
            Some("actuator"),
            Some("cloud"),
        ],
        7,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "schematic failed: {body}");
}

pub async fn submit_round3(app: &Router, team_id: &str, tests: i32, minutes: i32) -> (StatusCode, Value) {
    post(
        app,
        "/api/round3/submit",
        json!({ "teamId": team_id, "testCasesPassed": tests, "timeTaken": minutes }),
    )
    .await
}
