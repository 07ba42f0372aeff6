//! PC방 customer insight engine.
//!
//! Retention curves by visit frequency, a what-if revenue simulator,
//! demographic breakdowns and a churn-risk list over a customer export,
//! plus SQLite persistence for targeting preferences and marketing notes.

pub mod churn_risk;
pub mod config;
pub mod customer;
pub mod demographics;
pub mod engine;
pub mod error;
pub mod filter;
pub mod loader;
pub mod population;
pub mod retention;
pub mod rng;
pub mod simulation;
pub mod store;
pub mod types;
