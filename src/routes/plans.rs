// ABOUTME: Plan generation route handlers dispatching on the planType discriminator
// ABOUTME: Orchestrates prompt building, chain fallback, JSON recovery, and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! Plan generation routes
//!
//! One POST endpoint (with the legacy path kept as an alias) handles both
//! plan types. Control flow per request is strictly linear: parse, build
//! prompt, walk the provider chain, recover JSON, decode, validate, reply.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::AppError,
    llm::{ChatMessage, ChatRequest},
    plans::{
        prompts, recovery, validation, MealPlan, MealPlanRequest, PlanRequest, PlanResponse,
        WorkoutPlan, WorkoutPlanRequest,
    },
    server::ServerResources,
};

/// Plan routes handler
pub struct PlanRoutes;

impl PlanRoutes {
    /// Create all plan generation routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/plan", post(Self::generate_plan))
            // Path the deployed mobile clients still call
            .route("/api/zindeai-router", post(Self::generate_plan))
            .with_state(resources)
    }

    /// Dispatch a plan request on its `planType` discriminator
    async fn generate_plan(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<PlanRequest>,
    ) -> Result<Response, AppError> {
        let request_id = Uuid::new_v4().to_string();

        let result = match request {
            PlanRequest::Meal(meal) => Self::generate_meal_plan(&resources, meal).await,
            PlanRequest::Workout(workout) => {
                Self::generate_workout_plan(&resources, workout).await
            }
        };

        result.map_err(|e| e.with_request_id(request_id))
    }

    /// Build the chain request shared by both plan types
    fn chat_request(resources: &ServerResources, system: &str, prompt: String) -> ChatRequest {
        let llm = &resources.config.llm;
        let mut request = ChatRequest::new(vec![
            ChatMessage::system(system),
            ChatMessage::user(prompt),
        ])
        .with_temperature(llm.temperature)
        .with_max_tokens(llm.max_tokens)
        .with_json_mode();

        if let Some(model) = &llm.model {
            request = request.with_model(model);
        }

        request
    }

    /// Generate and validate a meal plan
    async fn generate_meal_plan(
        resources: &ServerResources,
        request: MealPlanRequest,
    ) -> Result<Response, AppError> {
        info!(
            calories = request.calories,
            goal = %request.goal,
            diet = %request.diet,
            days = request.days_per_week,
            "Meal plan requested"
        );

        let prompt = prompts::meal_plan_prompt(&request);
        let chat = Self::chat_request(resources, prompts::MEAL_SYSTEM_PROMPT, prompt);

        let outcome = resources.chain.generate(&chat).await?;
        let value = recovery::extract_json(&outcome.response.content)
            .map_err(|e| e.with_provider(outcome.provider))?;
        let plan: MealPlan =
            recovery::decode_plan(value).map_err(|e| e.with_provider(outcome.provider))?;

        validation::validate_meal_plan(&plan, &request)
            .map_err(|e| e.with_provider(outcome.provider))?;

        info!(
            provider = outcome.provider,
            days = plan.weekly_plan.len(),
            "Meal plan generated"
        );

        Ok((StatusCode::OK, Json(PlanResponse::new("meal", plan))).into_response())
    }

    /// Generate and validate a workout plan
    async fn generate_workout_plan(
        resources: &ServerResources,
        request: WorkoutPlanRequest,
    ) -> Result<Response, AppError> {
        info!(
            goal = %request.goal,
            level = %request.fitness_level,
            days = request.days_per_week,
            mode = %request.mode,
            "Workout plan requested"
        );

        let prompt = prompts::workout_plan_prompt(&request);
        let chat = Self::chat_request(resources, prompts::WORKOUT_SYSTEM_PROMPT, prompt);

        let outcome = resources.chain.generate(&chat).await?;
        let value = recovery::extract_json(&outcome.response.content)
            .map_err(|e| e.with_provider(outcome.provider))?;
        let plan: WorkoutPlan =
            recovery::decode_plan(value).map_err(|e| e.with_provider(outcome.provider))?;

        validation::validate_workout_plan(&plan, &request)
            .map_err(|e| e.with_provider(outcome.provider))?;

        info!(
            provider = outcome.provider,
            days = plan.days.len(),
            split = %plan.split_type,
            "Workout plan generated"
        );

        Ok((StatusCode::OK, Json(PlanResponse::new("workout", plan))).into_response())
    }
}
