// ABOUTME: Request and response DTOs for meal and workout plan generation
// ABOUTME: Wire shapes match the mobile client contract (camelCase, planType discriminator)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! # Plan Data Model
//!
//! Transient, per-request JSON values exchanged with the mobile client and
//! decoded from repaired LLM output. There is no persistence; the only
//! invariants are the ones enforced by [`validation`].

pub mod prompts;
pub mod recovery;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Inbound Requests
// ============================================================================

/// A plan generation request, discriminated on the `planType` field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "planType", rename_all = "lowercase")]
pub enum PlanRequest {
    /// Meal plan generation
    Meal(MealPlanRequest),
    /// Workout plan generation
    Workout(WorkoutPlanRequest),
}

impl PlanRequest {
    /// The discriminator value, echoed back in responses
    #[must_use]
    pub const fn plan_type(&self) -> &'static str {
        match self {
            Self::Meal(_) => "meal",
            Self::Workout(_) => "workout",
        }
    }
}

/// Profile fields for meal plan generation
///
/// Defaults mirror the values the mobile client has always assumed when a
/// field is omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanRequest {
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default = "default_sex")]
    pub sex: String,
    #[serde(default = "default_weight")]
    pub weight_kg: f64,
    #[serde(default = "default_height")]
    pub height_cm: f64,
    #[serde(default = "default_activity")]
    pub activity: String,
    #[serde(default = "default_goal")]
    pub goal: String,
    #[serde(default = "default_diet")]
    pub diet: String,
    #[serde(default = "default_calories")]
    pub calories: u32,
    #[serde(default = "default_days")]
    pub days_per_week: u8,
    /// Free-form preference toggles (e.g. `{"highProtein": true}`)
    #[serde(default)]
    pub preferences: BTreeMap<String, bool>,
}

fn default_age() -> u32 {
    25
}
fn default_sex() -> String {
    "male".to_owned()
}
fn default_weight() -> f64 {
    70.0
}
fn default_height() -> f64 {
    175.0
}
fn default_activity() -> String {
    "moderately_active".to_owned()
}
fn default_goal() -> String {
    "maintain".to_owned()
}
fn default_diet() -> String {
    "balanced".to_owned()
}
fn default_calories() -> u32 {
    2000
}
fn default_days() -> u8 {
    7
}

/// Profile fields for workout plan generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlanRequest {
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default = "default_sex")]
    pub gender: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_fitness_level")]
    pub fitness_level: String,
    #[serde(default = "default_workout_goal")]
    pub goal: String,
    /// Training location: "gym" or "home"
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_workout_days")]
    pub days_per_week: u8,
    /// Preferred split, or "AUTO" to let the split table decide
    #[serde(default)]
    pub preferred_split: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub injuries: Vec<String>,
    /// Minutes available per session
    #[serde(default = "default_session_minutes")]
    pub time_per_session: u32,
}

fn default_fitness_level() -> String {
    "beginner".to_owned()
}
fn default_workout_goal() -> String {
    "general fitness".to_owned()
}
fn default_mode() -> String {
    "gym".to_owned()
}
fn default_workout_days() -> u8 {
    3
}
fn default_session_minutes() -> u32 {
    45
}

// ============================================================================
// Generated Plans
// ============================================================================

/// A generated meal plan
///
/// Numeric fields default to zero because repaired model output may omit
/// them; [`validation`] decides whether the result is acceptable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fat: f64,
    #[serde(default)]
    pub weekly_plan: Vec<MealDay>,
}

/// One day of a meal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealDay {
    pub day: String,
    #[serde(default)]
    pub meals: Vec<Meal>,
}

/// A single meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    /// Meal slot: breakfast, lunch, dinner, snack
    #[serde(rename = "type", default)]
    pub meal_type: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A generated workout plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    #[serde(default = "default_week_number")]
    pub week_number: u32,
    #[serde(default)]
    pub split_type: String,
    #[serde(default)]
    pub progression_notes: String,
    #[serde(default)]
    pub days: Vec<WorkoutDay>,
}

fn default_week_number() -> u32 {
    1
}

/// One training day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub day: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// A single exercise prescription
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub exercise_id: String,
    pub name: String,
    #[serde(default)]
    pub sets: u32,
    /// Repetitions, either a number or a range like "8-10"
    #[serde(default)]
    pub reps: String,
    /// Rest in whole seconds
    #[serde(default)]
    pub rest: u32,
}

// ============================================================================
// Response Envelope
// ============================================================================

/// Success envelope returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse<T> {
    pub success: bool,
    pub plan_type: String,
    pub data: T,
}

impl<T> PlanResponse<T> {
    /// Wrap a generated plan in the success envelope
    pub fn new(plan_type: &str, data: T) -> Self {
        Self {
            success: true,
            plan_type: plan_type.to_owned(),
            data,
        }
    }
}
