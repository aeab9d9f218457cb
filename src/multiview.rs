//! Multiview ensemble selection.
//!
//! Enumerates every E-sized combination of the candidate columns, ranks the
//! combinations by in-sample skill (prediction over the library range), then
//! re-runs the top-k combinations out-of-sample and averages their forecasts
//! pointwise into a single ensemble prediction.
//!
//! Ye H., and G. Sugihara, 2016. Information leverage in interconnected
//! ecosystems: Overcoming the curse of dimensionality. Science 353:922-925.

use crate::error::{EdmSweepError, Result};
use crate::predictor::{PredictionResult, Predictor};
use crate::skill::{compute_skill, Skill};
use crate::types::{ColumnId, PredictionConfig};
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Options for Multiview selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiviewOptions {
    /// Number of top-ranked combinations to ensemble. `None` uses the
    /// Ye & Sugihara default of max(2, floor(sqrt(m))) for m combinations.
    /// Always clamped to the number of combinations.
    pub top_k: Option<usize>,
    /// Refuse to enumerate more combinations than this. The combination
    /// count grows as C(n, E), so large column sets are rejected up front
    /// rather than run for hours.
    pub max_combinations: u64,
    /// Print the in-sample rankings to stderr.
    pub verbose: bool,
}

impl Default for MultiviewOptions {
    fn default() -> Self {
        Self {
            top_k: None,
            max_combinations: 10_000,
            verbose: false,
        }
    }
}

/// Skill of one column combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboRecord {
    /// The columns forming the embedding, in enumeration order.
    pub columns: Vec<ColumnId>,
    /// Skill achieved with that combination.
    pub skill: Skill,
}

/// Outcome of Multiview selection and ensembling.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiviewResult {
    /// Every combination with its in-sample skill, sorted by descending rho
    /// (undefined skill last; ties keep enumeration order).
    pub rankings: Vec<ComboRecord>,
    /// Out-of-sample skill of the selected top-k combinations, in ranking
    /// order.
    pub selected: Vec<ComboRecord>,
    /// Pointwise mean of the selected out-of-sample forecasts.
    pub ensemble: PredictionResult,
    /// Skill of the ensemble forecast against the observed sequence.
    pub ensemble_skill: Skill,
}

/// Rank column combinations in-sample and ensemble the top-k out-of-sample.
///
/// `base.embed_dimension` is the combination size E. Fails with
/// `InsufficientColumns` when fewer than E candidate columns are given and
/// with `TooManyCombinations` when C(n, E) exceeds the configured bound,
/// before any prediction runs.
pub fn select_and_ensemble<P: Predictor + Sync>(
    base: &PredictionConfig,
    candidate_columns: &[ColumnId],
    options: &MultiviewOptions,
    predictor: &P,
) -> Result<MultiviewResult> {
    let e = base.embed_dimension;
    if e < 1 {
        return Err(EdmSweepError::InvalidConfig(
            "embedding dimension E must be at least 1".to_string(),
        ));
    }
    let n = candidate_columns.len();
    if n < e {
        return Err(EdmSweepError::InsufficientColumns {
            available: n,
            needed: e,
        });
    }

    let count = n_combinations(n, e);
    if count > options.max_combinations {
        return Err(EdmSweepError::TooManyCombinations {
            count,
            limit: options.max_combinations,
        });
    }

    let combos = combinations(n, e);

    // In-sample skill: predict over the library range itself
    let mut in_sample_base = base.clone();
    in_sample_base.prediction = base.library;

    let in_sample: Vec<ComboRecord> = combos
        .par_iter()
        .map(|combo| eval_combo(&in_sample_base, candidate_columns, combo, predictor))
        .collect::<Result<Vec<_>>>()?;

    // Stable sort keeps enumeration order for equal rho; undefined skill
    // sorts last
    let mut rankings = in_sample;
    rankings.sort_by(|a, b| {
        let rho_a = a.skill.rho().unwrap_or(f64::NEG_INFINITY);
        let rho_b = b.skill.rho().unwrap_or(f64::NEG_INFINITY);
        rho_b.partial_cmp(&rho_a).unwrap_or(std::cmp::Ordering::Equal)
    });

    let m = rankings.len();
    let top_k = options
        .top_k
        .unwrap_or_else(|| 2.max((m as f64).sqrt() as usize))
        .min(m)
        .max(1);

    if options.verbose {
        eprintln!("Multiview in-sample rankings (top {} of {}):", top_k, m);
        for record in rankings.iter().take(top_k) {
            eprintln!(
                "  {}  rho = {}",
                join_columns(&record.columns),
                record
                    .skill
                    .rho()
                    .map_or("undefined".to_string(), |rho| format!("{:.4}", rho)),
            );
        }
    }

    // Out-of-sample runs for the selected combinations
    let mut selected = Vec::with_capacity(top_k);
    let mut forecasts: Vec<PredictionResult> = Vec::with_capacity(top_k);
    for record in rankings.iter().take(top_k) {
        let config = base.clone().with_columns(record.columns.clone());
        config.validate()?;
        let prediction = predictor.predict(&config)?;
        let skill = compute_skill(prediction.observed().view(), prediction.predicted().view())?;
        selected.push(ComboRecord {
            columns: record.columns.clone(),
            skill,
        });
        forecasts.push(prediction);
    }

    let ensemble = ensemble_mean(&forecasts)?;
    let ensemble_skill = compute_skill(ensemble.observed().view(), ensemble.predicted().view())?;

    Ok(MultiviewResult {
        rankings,
        selected,
        ensemble,
        ensemble_skill,
    })
}

/// Evaluate one combination against the given base config.
fn eval_combo<P: Predictor>(
    base: &PredictionConfig,
    candidate_columns: &[ColumnId],
    combo: &[usize],
    predictor: &P,
) -> Result<ComboRecord> {
    let columns: Vec<ColumnId> = combo.iter().map(|&i| candidate_columns[i].clone()).collect();
    let config = base.clone().with_columns(columns.clone());
    config.validate()?;
    let prediction = predictor.predict(&config)?;
    let skill = compute_skill(prediction.observed().view(), prediction.predicted().view())?;
    Ok(ComboRecord { columns, skill })
}

/// Pointwise mean of the selected forecasts, carrying the observed sequence
/// and time axis of the first one.
fn ensemble_mean(forecasts: &[PredictionResult]) -> Result<PredictionResult> {
    let first = forecasts.first().ok_or_else(|| {
        EdmSweepError::InvalidConfig("no combinations selected for the ensemble".to_string())
    })?;
    let len = first.len();

    let mut mean = Array1::<f64>::zeros(len);
    for forecast in forecasts {
        if forecast.len() != len {
            return Err(EdmSweepError::ShapeMismatch {
                expected: format!("{} forecast rows", len),
                actual: format!("{} forecast rows", forecast.len()),
            });
        }
        mean += forecast.predicted();
    }
    mean /= forecasts.len() as f64;

    let result = PredictionResult::new(first.observed().clone(), mean)?;
    match first.time() {
        Some(time) => result.with_time(time.clone()),
        None => Ok(result),
    }
}

fn join_columns(columns: &[ColumnId]) -> String {
    columns
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// C(n, k), saturating at `u64::MAX`.
fn n_combinations(n: usize, k: usize) -> u64 {
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 1..=k as u128 {
        result = result * (n as u128 - k as u128 + i) / i;
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    result as u64
}

/// All k-sized index combinations of 0..n, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut combos = Vec::new();
    if k > n {
        return combos;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        combos.push(idx.clone());
        let mut i = k;
        loop {
            if i == 0 {
                return combos;
            }
            i -= 1;
            if idx[i] != i + n - k {
                break;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_n_combinations() {
        assert_eq!(n_combinations(3, 2), 3);
        assert_eq!(n_combinations(5, 3), 10);
        assert_eq!(n_combinations(4, 4), 1);
        assert_eq!(n_combinations(10, 1), 10);
    }

    #[test]
    fn test_combinations_lexicographic() {
        assert_eq!(
            combinations(3, 2),
            vec![vec![0, 1], vec![0, 2], vec![1, 2]]
        );
        assert_eq!(combinations(4, 4), vec![vec![0, 1, 2, 3]]);
        assert_eq!(combinations(4, 1).len(), 4);
    }

    #[test]
    fn test_combination_count_matches_formula() {
        assert_eq!(combinations(7, 3).len() as u64, n_combinations(7, 3));
    }
}
