//! # uritrace-core
//!
//! Core library for uritrace - a personal urinary-health tracker.
//!
//! This library provides:
//! - Domain types for sessions, symptoms, and outcomes
//! - Session lifecycle tracking against a pluggable store
//! - Deterministic analytics (rates, trends, weekly aggregation)
//! - A rule-based health insight engine and doctor-visit summary
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Determinism
//!
//! Nothing in the analytics or insight layers reads the clock or the
//! ambient timezone. Every computation takes its reference instant (and
//! through it the calendar) as an argument, so the same session history
//! always produces the same numbers, insights, and summary text.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use uritrace_core::insights::generate_insights;
//! use uritrace_core::store::{MemoryRepository, NullObserver, SessionTracker};
//! use uritrace_core::Outcome;
//!
//! let mut tracker = SessionTracker::new(MemoryRepository::new(), NullObserver);
//! tracker.start_session(Utc::now()).expect("start");
//! tracker
//!     .complete_session(Utc::now(), Outcome::Positive, None)
//!     .expect("complete");
//!
//! let sessions = tracker.sessions().expect("fetch");
//! let now = Utc::now();
//! for insight in generate_insights(&sessions, &now) {
//!     println!("[{}] {}", insight.category.label(), insight.title);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{DateRange, TimeCluster, Trend, TrendPeriod, WeeklyInsights};
pub use config::Config;
pub use error::{Error, Result};
pub use insights::{Category, HealthInsight, Priority};
pub use store::{SessionRepository, SessionTracker, SyncObserver};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod insights;
pub mod logging;
pub mod store;
pub mod time;
pub mod types;
