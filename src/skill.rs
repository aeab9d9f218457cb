//! Prediction skill metrics.
//!
//! Skill is the Pearson correlation rho between observed and predicted
//! values, reported together with RMSE and MAE. Degenerate inputs (empty
//! sequences, zero variance) yield [`Skill::Undefined`] instead of a failure
//! so that one bad record never aborts a sweep.

use crate::error::{EdmSweepError, Result};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Skill metrics for one prediction run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillScores {
    /// Pearson correlation between observed and predicted values.
    pub rho: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute error.
    pub mae: f64,
}

/// Skill of one prediction run, or the undefined sentinel for degenerate
/// inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Skill {
    Defined(SkillScores),
    Undefined,
}

impl Skill {
    /// Pearson rho, if defined.
    pub fn rho(&self) -> Option<f64> {
        match self {
            Skill::Defined(scores) => Some(scores.rho),
            Skill::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Skill::Defined(_))
    }
}

/// Compute skill metrics for aligned observed/predicted sequences.
///
/// Returns `ShapeMismatch` when the sequences differ in length. Sequences
/// shorter than two points, sequences with non-finite values, and sequences
/// with zero variance in either side produce [`Skill::Undefined`].
pub fn compute_skill(observed: ArrayView1<f64>, predicted: ArrayView1<f64>) -> Result<Skill> {
    if observed.len() != predicted.len() {
        return Err(EdmSweepError::ShapeMismatch {
            expected: format!("{} observed values", observed.len()),
            actual: format!("{} predicted values", predicted.len()),
        });
    }

    let n = observed.len();
    if n < 2 {
        return Ok(Skill::Undefined);
    }

    let n_f = n as f64;
    let mean_obs = observed.sum() / n_f;
    let mean_pred = predicted.sum() / n_f;

    let mut cov = 0.0;
    let mut var_obs = 0.0;
    let mut var_pred = 0.0;
    let mut sq_err = 0.0;
    let mut abs_err = 0.0;
    for (&o, &p) in observed.iter().zip(predicted.iter()) {
        let d_o = o - mean_obs;
        let d_p = p - mean_pred;
        cov += d_o * d_p;
        var_obs += d_o * d_o;
        var_pred += d_p * d_p;
        let err = o - p;
        sq_err += err * err;
        abs_err += err.abs();
    }

    if var_obs == 0.0 || var_pred == 0.0 {
        return Ok(Skill::Undefined);
    }

    let rho = cov / (var_obs.sqrt() * var_pred.sqrt());
    if !rho.is_finite() {
        return Ok(Skill::Undefined);
    }

    Ok(Skill::Defined(SkillScores {
        rho,
        rmse: (sq_err / n_f).sqrt(),
        mae: abs_err / n_f,
    }))
}
