//! The seam to the external EDM prediction primitive.
//!
//! State-space reconstruction and Simplex/S-Map projection live outside this
//! crate; sweeps reach them through the [`Predictor`] trait. Any closure from
//! a config to a [`PredictionResult`] implements it, which is also how tests
//! stub the primitive.

use crate::error::{EdmSweepError, Result};
use crate::types::PredictionConfig;
use ndarray::Array1;

/// Output of one prediction run: observed and predicted sequences aligned by
/// time index, with an optional time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    time: Option<Array1<f64>>,
    observed: Array1<f64>,
    predicted: Array1<f64>,
}

impl PredictionResult {
    /// Build a result from aligned sequences; rejects length mismatch.
    pub fn new(observed: Array1<f64>, predicted: Array1<f64>) -> Result<Self> {
        if observed.len() != predicted.len() {
            return Err(EdmSweepError::ShapeMismatch {
                expected: format!("{} observed values", observed.len()),
                actual: format!("{} predicted values", predicted.len()),
            });
        }
        Ok(Self {
            time: None,
            observed,
            predicted,
        })
    }

    /// Attach a time axis; must align with the value sequences.
    pub fn with_time(mut self, time: Array1<f64>) -> Result<Self> {
        if time.len() != self.observed.len() {
            return Err(EdmSweepError::ShapeMismatch {
                expected: format!("{} rows", self.observed.len()),
                actual: format!("{} time values", time.len()),
            });
        }
        self.time = Some(time);
        Ok(self)
    }

    pub fn time(&self) -> Option<&Array1<f64>> {
        self.time.as_ref()
    }

    pub fn observed(&self) -> &Array1<f64> {
        &self.observed
    }

    pub fn predicted(&self) -> &Array1<f64> {
        &self.predicted
    }

    /// Number of aligned (observed, predicted) pairs.
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}

/// The external EDM prediction primitive.
///
/// Implementations receive a fully specified [`PredictionConfig`] and return
/// aligned observed/predicted sequences. They may read the input source named
/// by the config; that I/O is the implementation's responsibility. Failures
/// are propagated to the caller and abort the sweep that issued the run.
pub trait Predictor {
    fn predict(&self, config: &PredictionConfig) -> Result<PredictionResult>;
}

impl<F> Predictor for F
where
    F: Fn(&PredictionConfig) -> Result<PredictionResult>,
{
    fn predict(&self, config: &PredictionConfig) -> Result<PredictionResult> {
        self(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PredictionConfig;
    use ndarray::array;

    #[test]
    fn test_result_rejects_mismatched_lengths() {
        let result = PredictionResult::new(array![1.0, 2.0], array![1.0]);
        assert!(matches!(result, Err(EdmSweepError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_result_rejects_mismatched_time_axis() {
        let result = PredictionResult::new(array![1.0, 2.0], array![1.0, 2.0])
            .unwrap()
            .with_time(array![0.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_closure_is_a_predictor() {
        let stub = |_config: &PredictionConfig| {
            PredictionResult::new(array![1.0, 2.0, 3.0], array![1.0, 2.0, 3.0])
        };
        let config = PredictionConfig::new("stub.csv").with_embedded(true);
        let result = stub.predict(&config).unwrap();
        assert_eq!(result.len(), 3);
        assert!(!result.is_empty());
    }
}
