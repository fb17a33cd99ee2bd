// ABOUTME: Semantic validation of parsed plans against the originating request
// ABOUTME: Day counts, calorie/protein bands, banned foods, rest days, exercise catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! # Plan Validation
//!
//! Predicate checks over the parsed plan. A failing check surfaces a
//! descriptive error to the caller; there is no repair-and-retry loop beyond
//! the provider fallback that already happened.

use super::prompts::is_approved_exercise;
use super::{MealPlan, MealPlanRequest, WorkoutPlan, WorkoutPlanRequest};
use crate::errors::{AppError, ErrorCode};

/// Accepted relative deviation of `totalCalories` from the requested target
const CALORIE_TOLERANCE: f64 = 0.25;

/// Accepted protein band in grams per kilogram of body weight
const PROTEIN_MIN_G_PER_KG: f64 = 1.0;
const PROTEIN_MAX_G_PER_KG: f64 = 3.5;

/// Upper sanity bounds for exercise prescriptions
const MAX_SETS: u32 = 10;
const MAX_REST_SECS: u32 = 600;

/// Foods banned per diet type, matched case-insensitively as substrings
fn banned_foods(diet: &str) -> &'static [&'static str] {
    match diet.to_lowercase().as_str() {
        "vegan" => &[
            "chicken", "beef", "lamb", "turkey", "meat", "fish", "salmon", "tuna", "shrimp",
            "egg", "milk", "cheese", "yogurt", "butter", "honey",
        ],
        "vegetarian" => &[
            "chicken", "beef", "lamb", "turkey", "meat", "fish", "salmon", "tuna", "shrimp",
        ],
        "keto" | "ketogenic" => &["sugar", "bread", "rice", "pasta", "potato"],
        _ => &[],
    }
}

fn validation_error(message: String) -> AppError {
    AppError::new(ErrorCode::ExternalServiceError, message)
}

/// Validate a meal plan against the request that produced it
///
/// # Errors
///
/// Returns a descriptive error naming the first failed predicate.
pub fn validate_meal_plan(plan: &MealPlan, request: &MealPlanRequest) -> Result<(), AppError> {
    let expected_days = usize::from(request.days_per_week);
    if plan.weekly_plan.len() != expected_days {
        return Err(validation_error(format!(
            "Meal plan has {} day(s) but {} were requested",
            plan.weekly_plan.len(),
            expected_days
        )));
    }

    if request.calories > 0 && plan.total_calories > 0.0 {
        let target = f64::from(request.calories);
        let deviation = (plan.total_calories - target).abs() / target;
        if deviation > CALORIE_TOLERANCE {
            return Err(validation_error(format!(
                "Meal plan totals {} kcal, outside the accepted band around {} kcal",
                plan.total_calories, request.calories
            )));
        }
    }

    if plan.total_protein > 0.0 && request.weight_kg > 0.0 {
        let min = request.weight_kg * PROTEIN_MIN_G_PER_KG;
        let max = request.weight_kg * PROTEIN_MAX_G_PER_KG;
        if plan.total_protein < min || plan.total_protein > max {
            return Err(validation_error(format!(
                "Meal plan protein {}g is outside the {min:.0}-{max:.0}g band for {}kg body weight",
                plan.total_protein, request.weight_kg
            )));
        }
    }

    check_banned_foods(plan, &request.diet)?;

    Ok(())
}

/// Scan every meal name and item for diet-banned foods
fn check_banned_foods(plan: &MealPlan, diet: &str) -> Result<(), AppError> {
    let banned = banned_foods(diet);
    if banned.is_empty() {
        return Ok(());
    }

    for day in &plan.weekly_plan {
        for meal in &day.meals {
            let mut haystacks = vec![meal.name.to_lowercase()];
            haystacks.extend(meal.items.iter().map(|i| i.to_lowercase()));

            for haystack in &haystacks {
                if let Some(food) = banned.iter().find(|f| haystack.contains(*f)) {
                    return Err(validation_error(format!(
                        "Meal plan contains '{food}' on {} ('{}'), which a {diet} diet forbids",
                        day.day, meal.name
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Validate a workout plan against the request that produced it
///
/// # Errors
///
/// Returns a descriptive error naming the first failed predicate.
pub fn validate_workout_plan(
    plan: &WorkoutPlan,
    request: &WorkoutPlanRequest,
) -> Result<(), AppError> {
    let expected_days = usize::from(request.days_per_week);
    if plan.days.len() != expected_days {
        return Err(validation_error(format!(
            "Workout plan has {} day(s) but {} were requested",
            plan.days.len(),
            expected_days
        )));
    }

    for day in &plan.days {
        // Every returned day must be a training day
        if day.exercises.is_empty() || day.focus.to_lowercase().contains("rest") {
            return Err(validation_error(format!(
                "Workout plan contains a rest day ('{}'); all {} days must be training days",
                day.day, expected_days
            )));
        }

        for exercise in &day.exercises {
            if !is_approved_exercise(&exercise.exercise_id) {
                return Err(validation_error(format!(
                    "Workout plan uses unapproved exercise '{}' on {}",
                    exercise.exercise_id, day.day
                )));
            }
            if exercise.sets == 0 || exercise.sets > MAX_SETS {
                return Err(validation_error(format!(
                    "Exercise '{}' has an implausible set count ({})",
                    exercise.name, exercise.sets
                )));
            }
            if exercise.rest > MAX_REST_SECS {
                return Err(validation_error(format!(
                    "Exercise '{}' has an implausible rest time ({}s)",
                    exercise.name, exercise.rest
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::{Exercise, Meal, MealDay, WorkoutDay};

    fn meal_request(days: u8, calories: u32, diet: &str) -> MealPlanRequest {
        serde_json::from_str(&format!(
            r#"{{"daysPerWeek": {days}, "calories": {calories}, "diet": "{diet}"}}"#
        ))
        .unwrap()
    }

    fn workout_request(days: u8) -> WorkoutPlanRequest {
        serde_json::from_str(&format!(r#"{{"daysPerWeek": {days}}}"#)).unwrap()
    }

    fn meal(name: &str, items: &[&str]) -> Meal {
        Meal {
            name: name.to_owned(),
            meal_type: "lunch".to_owned(),
            calories: 500.0,
            items: items.iter().map(|s| (*s).to_owned()).collect(),
            notes: None,
        }
    }

    fn meal_plan(days: usize) -> MealPlan {
        MealPlan {
            total_calories: 2000.0,
            total_protein: 140.0,
            total_carbs: 200.0,
            total_fat: 67.0,
            weekly_plan: (0..days)
                .map(|i| MealDay {
                    day: format!("Day {}", i + 1),
                    meals: vec![meal("Grilled Vegetables", &["zucchini", "pepper"])],
                })
                .collect(),
        }
    }

    fn training_day(day: &str) -> WorkoutDay {
        WorkoutDay {
            day: day.to_owned(),
            focus: "Full Body".to_owned(),
            exercises: vec![Exercise {
                exercise_id: "barbell_squat".to_owned(),
                name: "Barbell Squat".to_owned(),
                sets: 4,
                reps: "8-10".to_owned(),
                rest: 120,
            }],
        }
    }

    fn workout_plan(days: usize) -> WorkoutPlan {
        WorkoutPlan {
            week_number: 1,
            split_type: "Full Body".to_owned(),
            progression_notes: String::new(),
            days: (0..days).map(|i| training_day(&format!("Day {}", i + 1))).collect(),
        }
    }

    #[test]
    fn test_meal_plan_accepts_valid() {
        assert!(validate_meal_plan(&meal_plan(7), &meal_request(7, 2000, "balanced")).is_ok());
    }

    #[test]
    fn test_meal_plan_day_count_mismatch() {
        let err = validate_meal_plan(&meal_plan(5), &meal_request(7, 2000, "balanced"))
            .unwrap_err();
        assert!(err.message.contains("5 day(s) but 7 were requested"));
    }

    #[test]
    fn test_meal_plan_calories_out_of_band() {
        let mut plan = meal_plan(7);
        plan.total_calories = 3200.0;
        let err = validate_meal_plan(&plan, &meal_request(7, 2000, "balanced")).unwrap_err();
        assert!(err.message.contains("outside the accepted band"));
    }

    #[test]
    fn test_meal_plan_calorie_check_skipped_when_unreported() {
        let mut plan = meal_plan(7);
        plan.total_calories = 0.0;
        assert!(validate_meal_plan(&plan, &meal_request(7, 2000, "balanced")).is_ok());
    }

    #[test]
    fn test_banned_food_is_case_insensitive() {
        let mut plan = meal_plan(7);
        plan.weekly_plan[3].meals[0].items.push("Grilled CHICKEN breast".to_owned());
        let err = validate_meal_plan(&plan, &meal_request(7, 2000, "vegan")).unwrap_err();
        assert!(err.message.contains("chicken"));
        assert!(err.message.contains("vegan"));
    }

    #[test]
    fn test_banned_food_in_meal_name() {
        let mut plan = meal_plan(7);
        plan.weekly_plan[0].meals[0].name = "Tuna Salad".to_owned();
        let err = validate_meal_plan(&plan, &meal_request(7, 2000, "vegetarian")).unwrap_err();
        assert!(err.message.contains("tuna"));
    }

    #[test]
    fn test_balanced_diet_has_no_banned_foods() {
        let mut plan = meal_plan(7);
        plan.weekly_plan[0].meals[0].items.push("chicken".to_owned());
        assert!(validate_meal_plan(&plan, &meal_request(7, 2000, "balanced")).is_ok());
    }

    #[test]
    fn test_workout_plan_accepts_valid() {
        assert!(validate_workout_plan(&workout_plan(3), &workout_request(3)).is_ok());
    }

    #[test]
    fn test_workout_day_count_mismatch() {
        let err = validate_workout_plan(&workout_plan(2), &workout_request(4)).unwrap_err();
        assert!(err.message.contains("2 day(s) but 4 were requested"));
    }

    #[test]
    fn test_rest_day_rejected() {
        let mut plan = workout_plan(3);
        plan.days[2].focus = "Rest and recovery".to_owned();
        let err = validate_workout_plan(&plan, &workout_request(3)).unwrap_err();
        assert!(err.message.contains("rest day"));
    }

    #[test]
    fn test_empty_day_counts_as_rest_day() {
        let mut plan = workout_plan(3);
        plan.days[1].exercises.clear();
        assert!(validate_workout_plan(&plan, &workout_request(3)).is_err());
    }

    #[test]
    fn test_unapproved_exercise_rejected() {
        let mut plan = workout_plan(3);
        plan.days[0].exercises[0].exercise_id = "trapeze_swing".to_owned();
        let err = validate_workout_plan(&plan, &workout_request(3)).unwrap_err();
        assert!(err.message.contains("trapeze_swing"));
    }

    #[test]
    fn test_implausible_sets_rejected() {
        let mut plan = workout_plan(3);
        plan.days[0].exercises[0].sets = 0;
        assert!(validate_workout_plan(&plan, &workout_request(3)).is_err());
    }
}
