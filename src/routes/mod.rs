// ABOUTME: HTTP route handlers for the plan router
// ABOUTME: Exposes the plan generation endpoint and health checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! HTTP routes
//!
//! Route modules follow the struct-with-`routes()` pattern; the server
//! assembles them into one router and applies the CORS and trace layers.

pub mod health;
pub mod plans;

pub use health::HealthRoutes;
pub use plans::PlanRoutes;
