//!
//! VBus-Wheel turns raw hall-effect sensor edges into a trustworthy wheel
//! speed.
//!
//! The edge path runs in interrupt context and does nothing but timestamp
//! the pulse; a periodic task drains those timestamps into debounced,
//! plausibility-checked, moving-average-smoothed speed estimates, detects
//! the wheel coming to rest, and classifies traction against a reference
//! vehicle speed.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub use config::WheelConfig;

pub mod capture;
pub use capture::{EdgeCapture, EdgeSnapshot};

pub mod window;
pub use window::SmoothingWindow;

pub mod estimator;
pub use estimator::{EstimatorState, WheelCondition, WheelCorner, WheelEstimator};
