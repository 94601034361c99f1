//! Statistical building blocks for wildlife population analysis.
//!
//! This crate provides a collection of statistical tools including:
//!
//! - **Descriptive statistics**: count, mean, median, sample variance and standard deviation
//! - **Percentiles**: linearly interpolated percentile values
//! - **Histogram generation**: equal-width frequency distributions
//! - **Comprehensive statistics**: descriptive statistics, quartiles and a histogram in one pass
//! - **Box-plot summaries**: quartiles, 1.5·IQR whiskers and outliers
//! - **Correlation**: Pearson coefficients and correlation matrices
//! - **Survival analysis**: Kaplan-Meier estimator with Greenwood variance for censored data
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and storage
//! - [`histogram`]: Histogram construction for visualizing data distributions
//! - [`comprehensive`]: Comprehensive statistical analysis combining multiple measures
//! - [`box_plot`]: Five-number summaries for box-and-whisker charts
//! - [`correlation`]: Pearson correlation between columns
//! - [`survival`]: Kaplan-Meier survival curves for time-to-event data
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use wildlife_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Analyzing survival data
//!
//! ```
//! use wildlife_stats::survival::{DurationRecord, KaplanMeierCurve, Z_95};
//!
//! let records = vec![
//!     DurationRecord::event(10.0),    // died at day 10
//!     DurationRecord::censored(20.0), // still alive when observation stopped
//!     DurationRecord::event(30.0),    // died at day 30
//! ];
//! let curve = KaplanMeierCurve::estimate(&records).unwrap();
//! let band = curve.confidence_band(Z_95);
//! assert_eq!(band.len(), curve.points.len());
//! ```

pub mod box_plot;
pub mod comprehensive;
pub mod correlation;
pub mod descriptive;
pub mod histogram;
pub mod percentiles;
pub mod survival;
