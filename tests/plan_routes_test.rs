// ABOUTME: Integration tests for the plan generation HTTP surface with stub providers
// ABOUTME: Covers fallback order, exhaustion, recovery, validation surfacing, and CORS
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI
#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use zindeai_router::config::environment::{LlmConfig, ServerConfig};
use zindeai_router::errors::AppError;
use zindeai_router::llm::{
    ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, ProviderChain,
};
use zindeai_router::server::{PlanServer, ServerResources};

// ============================================================================
// Stub Provider
// ============================================================================

/// Stub provider that replies with a fixed body or a scripted failure
struct StubProvider {
    name: &'static str,
    reply: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    fn replying(name: &'static str, reply: impl Into<String>) -> Self {
        Self {
            name,
            reply: Some(reply.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(name: &'static str) -> Self {
        Self {
            name,
            reply: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn display_name(&self) -> &'static str {
        self.name
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::full_featured()
    }

    fn default_model(&self) -> &str {
        "stub-model"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &["stub-model"]
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(content) => Ok(ChatResponse {
                content: content.clone(),
                model: "stub-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            None => Err(AppError::external_service(self.name, "stub outage")),
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(self.reply.is_some())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn router_with(providers: Vec<Box<dyn LlmProvider>>) -> axum::Router {
    let config = ServerConfig {
        http_port: 0,
        llm: LlmConfig::default(),
    };
    let chain = ProviderChain::new(providers).unwrap();
    let resources = Arc::new(ServerResources::new(config, chain));
    PlanServer::new(resources).router()
}

fn meal_plan_json(days: usize) -> String {
    let day_entries: Vec<serde_json::Value> = (1..=days)
        .map(|i| {
            serde_json::json!({
                "day": format!("Day {i}"),
                "meals": [
                    {
                        "name": "Breakfast",
                        "type": "breakfast",
                        "calories": 500,
                        "items": ["oatmeal", "banana"]
                    },
                    {
                        "name": "Lunch",
                        "type": "lunch",
                        "calories": 700,
                        "items": ["lentil soup", "salad"]
                    },
                    {
                        "name": "Dinner",
                        "type": "dinner",
                        "calories": 600,
                        "items": ["grilled vegetables", "rice"]
                    },
                    {
                        "name": "Snack",
                        "type": "snack",
                        "calories": 200,
                        "items": ["almonds"]
                    }
                ]
            })
        })
        .collect();

    serde_json::json!({
        "totalCalories": 2000,
        "totalProtein": 140,
        "totalCarbs": 200,
        "totalFat": 65,
        "weeklyPlan": day_entries
    })
    .to_string()
}

fn workout_plan_json(days: usize) -> String {
    let day_entries: Vec<serde_json::Value> = (1..=days)
        .map(|i| {
            serde_json::json!({
                "day": format!("Day {i}"),
                "focus": "Full Body",
                "exercises": [
                    {
                        "exerciseId": "barbell_squat",
                        "name": "Barbell Squat",
                        "sets": 4,
                        "reps": "8-10",
                        "rest": 120
                    },
                    {
                        "exerciseId": "push_up",
                        "name": "Push-up",
                        "sets": 3,
                        "reps": "12",
                        "rest": 60
                    }
                ]
            })
        })
        .collect();

    serde_json::json!({
        "weekNumber": 1,
        "splitType": "Full Body",
        "progressionNotes": "Add weight weekly.",
        "days": day_entries
    })
    .to_string()
}

async fn post_plan(router: axum::Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/plan")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

fn meal_request_body() -> serde_json::Value {
    serde_json::json!({
        "planType": "meal",
        "calories": 2000,
        "goal": "lose",
        "daysPerWeek": 7
    })
}

// ============================================================================
// End-to-End Plan Generation
// ============================================================================

#[tokio::test]
async fn test_meal_plan_end_to_end_returns_seven_days() {
    let router = router_with(vec![Box::new(StubProvider::replying(
        "stub",
        meal_plan_json(7),
    ))]);

    let (status, body) = post_plan(router, meal_request_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["planType"], "meal");
    assert_eq!(body["data"]["weeklyPlan"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_meal_plan_recovers_fenced_output() {
    let fenced = format!(
        "Here is your plan:\n```json\n{}\n```\nEnjoy!",
        meal_plan_json(7)
    );
    let router = router_with(vec![Box::new(StubProvider::replying("stub", fenced))]);

    let (status, body) = post_plan(router, meal_request_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["weeklyPlan"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_workout_plan_end_to_end() {
    let router = router_with(vec![Box::new(StubProvider::replying(
        "stub",
        workout_plan_json(3),
    ))]);

    let (status, body) = post_plan(
        router,
        serde_json::json!({
            "planType": "workout",
            "fitnessLevel": "intermediate",
            "goal": "muscle_gain",
            "daysPerWeek": 3,
            "mode": "gym"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["planType"], "workout");
    assert_eq!(body["data"]["days"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["splitType"], "Full Body");
}

// ============================================================================
// Fallback Behavior
// ============================================================================

#[tokio::test]
async fn test_fallback_skips_failing_provider() {
    let failing = StubProvider::failing("primary");
    let failing_calls = failing.call_counter();
    let healthy = StubProvider::replying("secondary", meal_plan_json(7));
    let healthy_calls = healthy.call_counter();

    let router = router_with(vec![Box::new(failing), Box::new(healthy)]);
    let (status, body) = post_plan(router, meal_request_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
    assert_eq!(healthy_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_providers_after_success_are_not_called() {
    let first = StubProvider::replying("first", meal_plan_json(7));
    let second = StubProvider::replying("second", meal_plan_json(7));
    let second_calls = second.call_counter();

    let router = router_with(vec![Box::new(first), Box::new(second)]);
    let (status, _) = post_plan(router, meal_request_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_exhausted_chain_returns_aggregate_error() {
    let router = router_with(vec![
        Box::new(StubProvider::failing("alpha")),
        Box::new(StubProvider::failing("beta")),
    ]);

    let (status, body) = post_plan(router, meal_request_body()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("All AI providers failed"));
    assert!(message.contains("alpha"));
    assert!(message.contains("beta"));
}

// ============================================================================
// Validation Surfacing
// ============================================================================

#[tokio::test]
async fn test_day_count_mismatch_is_rejected() {
    let router = router_with(vec![Box::new(StubProvider::replying(
        "stub",
        meal_plan_json(5),
    ))]);

    let (status, body) = post_plan(router, meal_request_body()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("5 day(s) but 7 were requested"));
}

#[tokio::test]
async fn test_banned_food_is_rejected_for_vegan_diet() {
    let plan = meal_plan_json(7).replace("lentil soup", "Chicken Wrap");
    let router = router_with(vec![Box::new(StubProvider::replying("stub", plan))]);

    let (status, body) = post_plan(
        router,
        serde_json::json!({
            "planType": "meal",
            "calories": 2000,
            "goal": "lose",
            "diet": "vegan",
            "daysPerWeek": 7
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("chicken"));
}

#[tokio::test]
async fn test_unparseable_output_is_deterministic_error() {
    let router = router_with(vec![Box::new(StubProvider::replying(
        "stub",
        "Sorry, I cannot produce a plan right now.",
    ))]);

    let (status, body) = post_plan(router, meal_request_body()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "EXTERNAL_SERVICE_ERROR");
}

#[tokio::test]
async fn test_unknown_plan_type_is_client_error() {
    let router = router_with(vec![Box::new(StubProvider::replying(
        "stub",
        meal_plan_json(7),
    ))]);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/plan")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"planType": "yoga"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// ============================================================================
// Ambient Surface
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let router = router_with(vec![Box::new(StubProvider::replying(
        "stub",
        meal_plan_json(7),
    ))]);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let router = router_with(vec![Box::new(StubProvider::replying(
        "stub",
        meal_plan_json(7),
    ))]);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/plan")
                .header(header::ORIGIN, "https://app.zindeai.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_legacy_router_path_still_works() {
    let router = router_with(vec![Box::new(StubProvider::replying(
        "stub",
        meal_plan_json(7),
    ))]);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/zindeai-router")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(meal_request_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
