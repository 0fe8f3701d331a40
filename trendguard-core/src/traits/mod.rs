//! Core Traits and Abstractions for TrendGuard
//!
//! This module provides the trait definitions at the engine's extension
//! points, organized by functional area.
//!
//! ## Module Organization
//!
//! - [`condition`] - Operating-condition providers and their backing sources
//! - [`time`] - Time source abstraction for refresh bookkeeping
//!
//! ## Design Philosophy
//!
//! The evaluator is generic over its [`ConditionProvider`], so the common
//! case (one provider type per deployment) pays no dynamic dispatch. Hosts
//! that need to switch providers at runtime can still use
//! `Box<dyn ConditionProvider>`.
//!
//! ## Usage Example
//!
//! ```rust
//! use trendguard_core::traits::{ConditionProvider, SampleContext};
//! use trendguard_core::condition::FixedCondition;
//!
//! let mut provider = FixedCondition::new(12_500.0);
//! let sample = SampleContext::new(1_700_000_000.0, 10);
//! assert_eq!(provider.condition(&sample), Ok(12_500.0));
//! ```

pub mod condition;
pub mod time;

pub use condition::{ConditionProvider, ConditionSource, SampleContext};
pub use time::TimeSource;
