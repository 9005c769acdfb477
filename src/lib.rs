//! Ingredient, recipe and day-plan tracking with macro aggregation.
//!
//! The arithmetic lives in [`nutrition`]; the other modules load snapshots
//! from Postgres and hand them to it.

pub mod app;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod day_plans;
pub mod db;
pub mod error;
pub mod ingredients;
pub mod nutrition;
pub mod recipes;
pub mod state;
pub mod validate;
