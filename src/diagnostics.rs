//! Caller-facing sweep diagnostics.
//!
//! Thin entry points mirroring the classic EDM tools: each builds a
//! [`SweepSpec`] with the tool's default grid and hands off to
//! [`sweep::evaluate`]. Pass explicit candidate values to override a grid.

use crate::error::Result;
use crate::predictor::Predictor;
use crate::sweep::{self, SweepResult};
use crate::types::{Method, PredictionConfig, SweepSpec};

/// Default theta grid for the S-Map nonlinearity sweep.
pub const DEFAULT_THETA_GRID: [f64; 15] = [
    0.01, 0.1, 0.3, 0.5, 0.75, 1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0,
];

/// Prediction skill versus embedding dimension, E = 1 to 10 by default.
pub fn embed_dimension<P: Predictor>(
    base: &PredictionConfig,
    values: Option<Vec<usize>>,
    predictor: &P,
) -> Result<SweepResult> {
    let values = values.unwrap_or_else(|| (1..=10).collect());
    sweep::evaluate(base, &SweepSpec::EmbedDimension(values), predictor)
}

/// Prediction skill versus forecast horizon, Tp = 1 to 10 by default.
pub fn predict_decay<P: Predictor>(
    base: &PredictionConfig,
    values: Option<Vec<i32>>,
    predictor: &P,
) -> Result<SweepResult> {
    let values = values.unwrap_or_else(|| (1..=10).collect());
    sweep::evaluate(base, &SweepSpec::ForecastHorizon(values), predictor)
}

/// Prediction skill versus S-Map localization theta.
///
/// Forces `method = SMap` on the base config, as the sweep is only
/// meaningful for locally weighted regression.
pub fn smap_nl<P: Predictor>(
    base: &PredictionConfig,
    values: Option<Vec<f64>>,
    predictor: &P,
) -> Result<SweepResult> {
    let base = base.clone().with_method(Method::SMap);
    let values = values.unwrap_or_else(|| DEFAULT_THETA_GRID.to_vec());
    sweep::evaluate(&base, &SweepSpec::Theta(values), predictor)
}
