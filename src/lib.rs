//! A/B test significance calculator.
//!
//! Two-proportion z-test over visitor and conversion counts, with Wald
//! confidence intervals, power, and density samples for charting the two
//! conversion-rate distributions.

pub mod cli;
pub mod commands;
pub mod error;
pub mod model;
pub mod session;
pub mod stats;
pub mod util;
