//! Utility functions for forecasting models.

pub mod optimization;
pub mod stats;

pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::{normal_quantile, two_tier_z_score};
