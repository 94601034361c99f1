//! Kaplan-Meier survival estimation with Greenwood variance.
//!
//! The Kaplan-Meier estimator is a non-parametric statistic used to estimate the
//! survival function from lifetime data. It accounts for right-censored data
//! (subjects whose event had not been observed when observation stopped).
//!
//! # Conventions
//!
//! - The risk set at time `t` holds every subject with `duration >= t`.
//! - At tied times, events are processed before censoring: a subject censored
//!   at `t` is still at risk for events at `t`.
//! - Only times with at least one event produce a curve point. Censoring-only
//!   times shrink the risk set for later points.
//! - Pointwise confidence intervals use Greenwood's variance with the normal
//!   approximation `S ± z·√Var`, clipped to `[0, 1]`.

use serde::{Deserialize, Serialize};

/// Two-sided 95% standard normal quantile.
pub const Z_95: f64 = 1.959_963_984_540_054;

/// A single observation: how long the subject was followed and whether the
/// event of interest was observed at the end of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRecord {
    pub duration: f64,
    /// `false` means the observation was censored.
    pub event_occurred: bool,
}

impl DurationRecord {
    #[must_use]
    pub fn event(duration: f64) -> Self {
        Self {
            duration,
            event_occurred: true,
        }
    }

    #[must_use]
    pub fn censored(duration: f64) -> Self {
        Self {
            duration,
            event_occurred: false,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SurvivalError {
    #[display("no duration records to estimate from")]
    Empty,
    #[display("record {index} has invalid duration {duration} (must be finite and non-negative)")]
    InvalidDuration { index: usize, duration: f64 },
}

/// One step of the Kaplan-Meier curve, located at an event time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurvivalPoint {
    pub time: f64,
    /// Estimated probability of surviving past `time`.
    pub survival_probability: f64,
    /// Greenwood variance of `survival_probability`.
    pub variance_estimate: f64,
    /// Subjects at risk immediately before `time`.
    pub at_risk_count: usize,
    /// Events observed at exactly `time`.
    pub event_count: usize,
}

/// Pointwise confidence interval of the survival probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub time: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A vertex of the stair-step polyline used to draw a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepVertex {
    pub time: f64,
    pub survival_probability: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Kaplan-Meier survival curve for one group of subjects.
#[derive(Debug, Clone, Serialize)]
pub struct KaplanMeierCurve {
    /// Curve points, strictly increasing in time, one per distinct event time.
    pub points: Vec<SurvivalPoint>,
    /// Number of subjects the curve was estimated from.
    pub subject_count: usize,
    /// Number of censored subjects.
    pub censored_count: usize,
    /// Largest observed duration, event or censored.
    pub last_observed_time: f64,
    /// Set when every subject still at risk at the last point had the event.
    /// Survival is 0 there and the curve cannot be extended.
    pub terminated: bool,
}

impl KaplanMeierCurve {
    /// Computes the Kaplan-Meier survival curve from unordered records.
    ///
    /// # Errors
    ///
    /// Returns [`SurvivalError::Empty`] for an empty slice and
    /// [`SurvivalError::InvalidDuration`] for a negative or non-finite duration.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wildlife_stats::survival::{DurationRecord, KaplanMeierCurve};
    /// let records = [
    ///     DurationRecord::event(1.0),
    ///     DurationRecord::event(2.0),
    ///     DurationRecord::censored(3.0),
    /// ];
    /// let curve = KaplanMeierCurve::estimate(&records).unwrap();
    /// assert_eq!(curve.points.len(), 2);
    /// assert!((curve.survival_at(2.5) - 1.0 / 3.0).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn estimate(records: &[DurationRecord]) -> Result<Self, SurvivalError> {
        if records.is_empty() {
            return Err(SurvivalError::Empty);
        }
        if let Some((index, record)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| !r.duration.is_finite() || r.duration < 0.0)
        {
            return Err(SurvivalError::InvalidDuration {
                index,
                duration: record.duration,
            });
        }

        let mut sorted = records.to_vec();
        sorted.sort_by(|a, b| a.duration.total_cmp(&b.duration));

        let total = sorted.len();
        let mut points = vec![];
        let mut survival = 1.0;
        let mut greenwood_sum = 0.0;
        let mut terminated = false;

        let mut i = 0;
        while i < total {
            let time = sorted[i].duration;
            let at_risk = total - i;

            let mut events = 0;
            let mut j = i;
            while j < total && sorted[j].duration.total_cmp(&time).is_eq() {
                if sorted[j].event_occurred {
                    events += 1;
                }
                j += 1;
            }

            if events > 0 {
                if events == at_risk {
                    // Nobody survives this time; the Greenwood term would divide by zero.
                    survival = 0.0;
                    terminated = true;
                } else {
                    let n = at_risk as f64;
                    let d = events as f64;
                    survival *= (n - d) / n;
                    greenwood_sum += d / (n * (n - d));
                }
                points.push(SurvivalPoint {
                    time,
                    survival_probability: survival,
                    variance_estimate: survival * survival * greenwood_sum,
                    at_risk_count: at_risk,
                    event_count: events,
                });
            }

            i = j;
        }

        Ok(Self {
            points,
            subject_count: total,
            censored_count: sorted.iter().filter(|r| !r.event_occurred).count(),
            last_observed_time: sorted[total - 1].duration,
            terminated,
        })
    }

    /// Total number of events across all curve points.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.points.iter().map(|p| p.event_count).sum()
    }

    fn point_at(&self, time: f64) -> Option<&SurvivalPoint> {
        self.points.iter().rev().find(|p| p.time <= time)
    }

    /// Returns the survival probability at a specific time.
    ///
    /// The curve is a right-continuous step function: 1.0 before the first
    /// event, then the value of the latest point at or before `time`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wildlife_stats::survival::{DurationRecord, KaplanMeierCurve};
    /// let records = [DurationRecord::event(10.0), DurationRecord::event(20.0)];
    /// let curve = KaplanMeierCurve::estimate(&records).unwrap();
    ///
    /// assert_eq!(curve.survival_at(5.0), 1.0);  // Before first event
    /// assert_eq!(curve.survival_at(15.0), 0.5); // After first event
    /// assert_eq!(curve.survival_at(20.0), 0.0);
    /// ```
    #[must_use]
    pub fn survival_at(&self, time: f64) -> f64 {
        self.point_at(time).map_or(1.0, |p| p.survival_probability)
    }

    /// Returns the Greenwood variance at a specific time (0.0 before the first event).
    #[must_use]
    pub fn variance_at(&self, time: f64) -> f64 {
        self.point_at(time).map_or(0.0, |p| p.variance_estimate)
    }

    /// Pointwise confidence intervals at each curve point.
    #[must_use]
    pub fn confidence_band(&self, z: f64) -> Vec<ConfidenceInterval> {
        self.points
            .iter()
            .map(|p| {
                let (lower, upper) = interval(p.survival_probability, p.variance_estimate, z);
                ConfidenceInterval {
                    time: p.time,
                    lower,
                    upper,
                }
            })
            .collect()
    }

    /// Returns the median survival time.
    ///
    /// The median is where the survival probability first drops to or below
    /// 50%, linearly interpolated between adjacent curve points. `None` if the
    /// curve never reaches 50%.
    #[must_use]
    pub fn median_survival(&self) -> Option<f64> {
        let idx = self
            .points
            .iter()
            .position(|p| p.survival_probability <= 0.5)?;
        let p1 = &self.points[idx];
        if idx == 0 {
            return Some(p1.time);
        }
        let p0 = &self.points[idx - 1];
        let (t0, t1) = (p0.time, p1.time);
        let (s0, s1) = (p0.survival_probability, p1.survival_probability);
        Some(t0 + (0.5 - s0) / (s1 - s0) * (t1 - t0))
    }

    /// Stair-step polyline of the curve and its band, ready for plotting.
    ///
    /// Starts at `(0, 1)`, adds a horizontal and a vertical vertex per event
    /// time, and extends the last level to `last_observed_time`. Time is
    /// non-decreasing and probability non-increasing along the result.
    #[must_use]
    pub fn step_series(&self, z: f64) -> Vec<StepVertex> {
        let mut last = StepVertex {
            time: 0.0,
            survival_probability: 1.0,
            lower: 1.0,
            upper: 1.0,
        };
        let mut vertices = vec![last];
        for point in &self.points {
            if point.time > last.time {
                vertices.push(StepVertex {
                    time: point.time,
                    ..last
                });
            }
            let (lower, upper) = interval(point.survival_probability, point.variance_estimate, z);
            last = StepVertex {
                time: point.time,
                survival_probability: point.survival_probability,
                lower,
                upper,
            };
            vertices.push(last);
        }
        if self.last_observed_time > last.time {
            vertices.push(StepVertex {
                time: self.last_observed_time,
                ..last
            });
        }
        vertices
    }
}

fn interval(survival: f64, variance: f64, z: f64) -> (f64, f64) {
    let half_width = z * variance.sqrt();
    (
        (survival - half_width).clamp(0.0, 1.0),
        (survival + half_width).clamp(0.0, 1.0),
    )
}
