//! # shikkha-forecast - study forecast core
//!
//! Pure functions behind the "Future You Snapshot" and "Study Momentum"
//! dashboard widgets:
//!
//! - **Mastery Decay Estimator** - projected mastery, days until forgotten
//! - **Velocity / Momentum Calculator** - xp per hour, trend, momentum, peaks
//! - **Scenario Projector** - current / improved / neglected futures
//!
//! ## Design
//!
//! - **Stateless** - every call re-derives its output from the input snapshot
//! - **Total** - malformed input is clamped, never rejected
//! - **Deterministic** - the clock and timezone are parameters
//!
//! ## Modules
//!
//! - [`decay`] - two-branch mastery decay
//! - [`velocity`] - daily grouping, velocity profile, momentum cascade
//! - [`milestone`] - xp milestone table
//! - [`scenario`] - scenarios and per-topic forecasts
//! - [`forecast`] - `compute_forecast` and the Rayon batch variant
//! - [`sanitize`] - input clamping
//! - [`types`] - Activity Store records and shared enums
//!
//! ## Example
//!
//! ```rust
//! use shikkha_forecast::{compute_forecast, ForecastInput, ForecastOptions, MomentumLevel};
//!
//! let forecast = compute_forecast(&ForecastInput::default(), &ForecastOptions::default());
//! assert_eq!(forecast.average_retention_days, 7);
//! assert_eq!(forecast.velocity_profile.momentum_level, MomentumLevel::Stalled);
//! ```

pub mod decay;
pub mod forecast;
pub mod milestone;
pub mod sanitize;
pub mod scenario;
pub mod types;
pub mod velocity;

pub use types::*;

pub use decay::DecayEstimate;
pub use forecast::{compute_forecast, compute_forecasts, Forecast, ForecastInput, ForecastOptions};
pub use milestone::{Milestone, NextMilestone, MILESTONES};
pub use scenario::{ForecastScenario, ScenarioId, TopicForecast};
pub use velocity::{DailyMetric, StudyWindow, VelocityProfile};
