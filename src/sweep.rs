//! The sweep evaluator.
//!
//! Runs the prediction primitive once per candidate value of a swept
//! parameter and aggregates the per-run skill into an ordered table plus the
//! best-performing candidate. This is the engine behind the
//! embedding-dimension, forecast-horizon, theta, and library-size
//! diagnostics.

use crate::error::{EdmSweepError, Result};
use crate::predictor::Predictor;
use crate::skill::{compute_skill, Skill};
use crate::types::{PredictionConfig, SweepParameter, SweepSpec, SweepValue};
use serde::{Deserialize, Serialize};

/// Skill of one sweep candidate. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// The swept candidate value.
    pub value: SweepValue,
    /// Skill achieved with that value.
    pub skill: Skill,
}

/// Outcome of one sweep: records in candidate order plus the best candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// The parameter that was varied.
    pub parameter: SweepParameter,
    /// One record per candidate, in candidate order.
    pub records: Vec<SkillRecord>,
    /// The record with the highest finite rho; ties go to the earliest
    /// candidate. `None` when every record is undefined.
    pub best: Option<SkillRecord>,
}

/// Run the prediction primitive once per candidate value in `spec`, in order.
///
/// Each derived config is validated before the run; an invalid config or a
/// predictor failure aborts the whole sweep, since a partial sweep is not
/// meaningful for the downstream diagnostic. Zero-variance output yields an
/// undefined record and the sweep continues.
pub fn evaluate<P: Predictor>(
    base: &PredictionConfig,
    spec: &SweepSpec,
    predictor: &P,
) -> Result<SweepResult> {
    if spec.is_empty() {
        return Err(EdmSweepError::EmptySweep);
    }

    let mut records = Vec::with_capacity(spec.len());
    for i in 0..spec.len() {
        let config = spec.derive(base, i);
        config.validate()?;
        let prediction = predictor.predict(&config)?;
        let skill = compute_skill(prediction.observed().view(), prediction.predicted().view())?;
        records.push(SkillRecord {
            value: spec.value(i),
            skill,
        });
    }

    Ok(SweepResult {
        parameter: spec.parameter(),
        best: best_record(&records),
        records,
    })
}

/// The record with the highest finite rho, first occurrence winning ties.
fn best_record(records: &[SkillRecord]) -> Option<SkillRecord> {
    let mut best: Option<SkillRecord> = None;
    for record in records {
        if let Some(rho) = record.skill.rho() {
            let improves = match best.and_then(|b| b.skill.rho()) {
                Some(best_rho) => rho > best_rho,
                None => true,
            };
            if improves {
                best = Some(*record);
            }
        }
    }
    best
}
