// ABOUTME: Prompt builders for meal and workout plan generation
// ABOUTME: Embeds the approved exercise catalog, split rules, and exact JSON schemas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! Prompt construction for plan generation.
//!
//! The prompts pin down the JSON schema the client depends on; everything the
//! model is allowed to invent is fenced by the rules spelled out here, and
//! [`super::validation`] re-checks the hard ones after parsing.

use super::{MealPlanRequest, WorkoutPlanRequest};

/// System prompt for meal plan requests
pub const MEAL_SYSTEM_PROMPT: &str = "You are the ZindeAI nutrition expert. You build healthy, \
practical meal plans tailored to the user's profile. Respond with a single JSON object only - \
no commentary, no markdown.";

/// System prompt for workout plan requests
pub const WORKOUT_SYSTEM_PROMPT: &str = "You are the ZindeAI strength coach. You build \
professional training programs. Respond with a single JSON object only - no commentary, no \
markdown.";

/// Day names used to label plan entries
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Approved exercise catalog: (exerciseId, display name)
///
/// The workout prompt restricts the model to these ids and validation
/// rejects anything outside the list.
pub const APPROVED_EXERCISES: &[(&str, &str)] = &[
    ("barbell_bench_press", "Barbell Bench Press"),
    ("dumbbell_bench_press", "Dumbbell Bench Press"),
    ("incline_dumbbell_press", "Incline Dumbbell Press"),
    ("push_up", "Push-up"),
    ("overhead_press", "Overhead Press"),
    ("lateral_raise", "Lateral Raise"),
    ("barbell_squat", "Barbell Squat"),
    ("goblet_squat", "Goblet Squat"),
    ("leg_press", "Leg Press"),
    ("leg_curl", "Leg Curl"),
    ("lunges", "Lunges"),
    ("pull_up", "Pull-up"),
    ("lat_pulldown", "Lat Pulldown"),
    ("barbell_row", "Barbell Row"),
    ("biceps_curl", "Biceps Curl"),
    ("triceps_pushdown", "Triceps Pushdown"),
    ("plank", "Plank"),
];

/// Check whether an exercise id is in the approved catalog
#[must_use]
pub fn is_approved_exercise(exercise_id: &str) -> bool {
    APPROVED_EXERCISES.iter().any(|(id, _)| *id == exercise_id)
}

/// Pick a training split from the weekly day count
///
/// 2-3 days full body, 4 days upper/lower, 5-6 days push/pull/legs. A
/// concrete `preferredSplit` other than "AUTO" wins.
#[must_use]
pub fn split_for(days_per_week: u8, preferred: Option<&str>) -> String {
    if let Some(split) = preferred {
        if !split.is_empty() && !split.eq_ignore_ascii_case("auto") {
            return split.to_owned();
        }
    }
    match days_per_week {
        0..=3 => "Full Body".to_owned(),
        4 => "Upper/Lower".to_owned(),
        _ => "Push/Pull/Legs".to_owned(),
    }
}

/// Render the goal in plain words for the prompt
fn describe_goal(goal: &str) -> &str {
    match goal {
        "lose" => "weight loss",
        "gain" => "weight gain",
        "maintain" => "weight maintenance",
        other => other,
    }
}

/// Build the meal plan prompt for a request
#[must_use]
pub fn meal_plan_prompt(request: &MealPlanRequest) -> String {
    let preferences = request
        .preferences
        .iter()
        .filter(|(_, enabled)| **enabled)
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let preferences = if preferences.is_empty() {
        "none".to_owned()
    } else {
        preferences
    };

    let days = usize::from(request.days_per_week).min(DAY_NAMES.len());
    let day_list = DAY_NAMES[..days].join(", ");

    // Macro targets in the schema mirror the 30/40/30 baseline the client
    // has always displayed; the model adjusts per goal.
    let calories = f64::from(request.calories);
    let protein_target = (calories * 0.3 / 4.0).round();
    let carbs_target = (calories * 0.4 / 4.0).round();
    let fat_target = (calories * 0.3 / 9.0).round();

    format!(
        r#"Create a {days}-day meal plan.

USER PROFILE:
- Age: {age}
- Sex: {sex}
- Weight: {weight} kg
- Height: {height} cm
- Activity level: {activity}
- Goal: {goal}
- Diet type: {diet}
- Daily calories: {calories}
- Preferences: {preferences}

MANDATORY RULES:
1. Exactly {days} days ({day_list}), one entry per day.
2. Each day has 4 meals: breakfast, lunch, dinner, and one snack.
3. Respect the diet type strictly (vegan means no animal products at all;
   vegetarian means no meat or fish; ketogenic means maximum 30-50 g carbs).
4. Every meal lists its items - never leave "items" empty.
5. Daily totals stay close to {calories} kcal.
6. Return ONLY the JSON object below, fully filled in.

JSON FORMAT:
{{
  "totalCalories": {calories},
  "totalProtein": {protein},
  "totalCarbs": {carbs},
  "totalFat": {fat},
  "weeklyPlan": [
    {{
      "day": "Monday",
      "meals": [
        {{
          "name": "Breakfast",
          "type": "breakfast",
          "calories": 500,
          "items": ["item 1", "item 2"],
          "notes": "optional note"
        }}
      ]
    }}
  ]
}}"#,
        days = days,
        age = request.age,
        sex = request.sex,
        weight = request.weight_kg,
        height = request.height_cm,
        activity = request.activity,
        goal = describe_goal(&request.goal),
        diet = request.diet,
        calories = request.calories,
        preferences = preferences,
        day_list = day_list,
        protein = protein_target,
        carbs = carbs_target,
        fat = fat_target,
    )
}

/// Build the workout plan prompt for a request
#[must_use]
pub fn workout_plan_prompt(request: &WorkoutPlanRequest) -> String {
    let split = split_for(request.days_per_week, request.preferred_split.as_deref());
    let exercise_ids = APPROVED_EXERCISES
        .iter()
        .map(|(id, _)| format!("\"{id}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let equipment = if request.equipment.is_empty() {
        "none specified".to_owned()
    } else {
        request.equipment.join(", ")
    };
    let injuries = if request.injuries.is_empty() {
        "none".to_owned()
    } else {
        request.injuries.join(", ")
    };

    format!(
        r#"Create a {days}-day {level} training program with the "{split}" split.

USER PROFILE:
- Age: {age}
- Gender: {gender}
- Weight: {weight} kg
- Height: {height} cm
- Goal: {goal}
- Training location: {mode}
- Equipment: {equipment}
- Injuries: {injuries}
- Time per session: {minutes} minutes

MANDATORY RULES:
1. SPLIT LOGIC: 2-3 days means Full Body every day; 4 days means
   Upper/Lower/Upper/Lower; 5-6 days means Push/Pull/Legs rotation.
2. EXERCISE COUNT: Full Body days carry 6 to 8 exercises; split days carry
   5 to 6. Never fewer.
3. EXERCISE SOURCE: use ONLY these exerciseId values: [{exercise_ids}].
4. Rest times are whole seconds (45, 60, 90, 120, 180) - never ranges.
5. Every one of the {days} days is a training day - no rest days in the plan.
6. Reps are an integer or a range like "8-10". Sets are integers.
7. Return ONLY the JSON object below.

JSON FORMAT:
{{
  "weekNumber": 1,
  "splitType": "{split}",
  "progressionNotes": "string",
  "days": [
    {{
      "day": "Monday",
      "focus": "string",
      "exercises": [
        {{
          "exerciseId": "barbell_bench_press",
          "name": "Barbell Bench Press",
          "sets": 4,
          "reps": "8-10",
          "rest": 90
        }}
      ]
    }}
  ]
}}"#,
        days = request.days_per_week,
        level = request.fitness_level,
        split = split,
        age = request.age,
        gender = request.gender,
        weight = request.weight,
        height = request.height,
        goal = request.goal,
        mode = request.mode,
        equipment = equipment,
        injuries = injuries,
        minutes = request.time_per_session,
        exercise_ids = exercise_ids,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal_request() -> MealPlanRequest {
        serde_json::from_str(r#"{"calories": 1800, "goal": "lose", "daysPerWeek": 5, "diet": "vegan"}"#)
            .unwrap()
    }

    fn workout_request(days: u8) -> WorkoutPlanRequest {
        serde_json::from_str(&format!(r#"{{"daysPerWeek": {days}}}"#)).unwrap()
    }

    #[test]
    fn test_split_table() {
        assert_eq!(split_for(3, None), "Full Body");
        assert_eq!(split_for(4, None), "Upper/Lower");
        assert_eq!(split_for(5, None), "Push/Pull/Legs");
        assert_eq!(split_for(6, Some("AUTO")), "Push/Pull/Legs");
        assert_eq!(split_for(6, Some("Upper/Lower")), "Upper/Lower");
    }

    #[test]
    fn test_meal_prompt_carries_profile_and_day_count() {
        let prompt = meal_plan_prompt(&meal_request());
        assert!(prompt.contains("Create a 5-day meal plan"));
        assert!(prompt.contains("Daily calories: 1800"));
        assert!(prompt.contains("vegan"));
        assert!(prompt.contains("\"weeklyPlan\""));
    }

    #[test]
    fn test_workout_prompt_embeds_catalog() {
        let prompt = workout_plan_prompt(&workout_request(4));
        assert!(prompt.contains("\"barbell_squat\""));
        assert!(prompt.contains("Upper/Lower"));
        assert!(prompt.contains("no rest days"));
    }

    #[test]
    fn test_catalog_lookup() {
        assert!(is_approved_exercise("pull_up"));
        assert!(!is_approved_exercise("crossfit_burpee"));
    }
}
