//! Convergent Cross Mapping diagnostics.
//!
//! CCM sweeps the library size and reports how cross-map skill changes as
//! the library grows, rather than a single optimum: increasing rho with
//! library size is the signature of a causal link. Cross mapping runs in
//! both directions, column to target and target to column, with the
//! subsampling and the cross-map core left to the prediction primitive.

use crate::error::{EdmSweepError, Result};
use crate::predictor::Predictor;
use crate::sweep::{evaluate, SkillRecord};
use crate::types::{ColumnId, Method, PredictionConfig, SweepSpec};
use serde::{Deserialize, Serialize};

/// Library size range `[start, stop, increment]`, inclusive of `stop` when
/// it lands on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibSizes {
    pub start: usize,
    pub stop: usize,
    pub increment: usize,
}

impl LibSizes {
    pub fn new(start: usize, stop: usize, increment: usize) -> Self {
        Self {
            start,
            stop,
            increment,
        }
    }

    /// Expand the range into the ordered library size sequence.
    pub fn sizes(&self) -> Result<Vec<usize>> {
        if self.increment == 0 {
            return Err(EdmSweepError::InvalidConfig(
                "library size increment must be positive".to_string(),
            ));
        }
        if self.start == 0 {
            return Err(EdmSweepError::InvalidConfig(
                "library sizes must start at 1 or above".to_string(),
            ));
        }
        Ok((self.start..=self.stop).step_by(self.increment).collect())
    }
}

impl Default for LibSizes {
    fn default() -> Self {
        Self::new(10, 80, 10)
    }
}

/// Options for a CCM run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcmOptions {
    /// Library sizes to sweep.
    pub lib_sizes: LibSizes,
    /// Print the per-size skill table to stderr.
    pub verbose: bool,
}

impl Default for CcmOptions {
    fn default() -> Self {
        Self {
            lib_sizes: LibSizes::default(),
            verbose: false,
        }
    }
}

/// Cross-map skill in one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossMapResult {
    /// The embedded column the map runs from.
    pub from: ColumnId,
    /// The column being cross mapped.
    pub to: ColumnId,
    /// One record per library size, in sweep order.
    pub records: Vec<SkillRecord>,
    /// Rho at the largest library size minus rho at the smallest, over the
    /// defined records. `None` when fewer than two records are defined.
    pub convergence: Option<f64>,
}

impl CrossMapResult {
    /// Whether skill improved from the smallest to the largest library.
    pub fn is_convergent(&self) -> bool {
        self.convergence.is_some_and(|delta| delta > 0.0)
    }
}

/// Outcome of a CCM run in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CcmResult {
    /// Column to target.
    pub forward: CrossMapResult,
    /// Target to column.
    pub reverse: CrossMapResult,
}

/// Sweep cross-map skill over library sizes in both directions.
///
/// Requires `base.columns` to name the column to embed and `base.target` the
/// column to cross map. The method is forced to Simplex, as CCM is defined
/// over simplex projection.
pub fn cross_map<P: Predictor>(
    base: &PredictionConfig,
    options: &CcmOptions,
    predictor: &P,
) -> Result<CcmResult> {
    let column = base
        .columns
        .first()
        .cloned()
        .ok_or_else(|| {
            EdmSweepError::InvalidConfig("CCM requires a column to embed".to_string())
        })?;
    let target = base.target.clone().ok_or_else(|| {
        EdmSweepError::InvalidConfig("CCM requires a target column".to_string())
    })?;

    let sizes = options.lib_sizes.sizes()?;
    let spec = SweepSpec::LibrarySize(sizes);

    let forward_base = base.clone().with_method(Method::Simplex);
    let forward = map_direction(&forward_base, &spec, column.clone(), target.clone(), predictor)?;

    let reverse_base = forward_base
        .with_columns(vec![target.clone()])
        .with_target(column.clone());
    let reverse = map_direction(&reverse_base, &spec, target.clone(), column.clone(), predictor)?;

    if options.verbose {
        eprintln!("lib_size  rho {} to {}  rho {} to {}", column, target, target, column);
        for (fwd, rev) in forward.records.iter().zip(reverse.records.iter()) {
            eprintln!(
                "{:>8}  {:>10}  {:>10}",
                fwd.value,
                format_rho(fwd),
                format_rho(rev),
            );
        }
    }

    Ok(CcmResult { forward, reverse })
}

fn map_direction<P: Predictor>(
    base: &PredictionConfig,
    spec: &SweepSpec,
    from: ColumnId,
    to: ColumnId,
    predictor: &P,
) -> Result<CrossMapResult> {
    let sweep = evaluate(base, spec, predictor)?;
    let convergence = convergence_delta(&sweep.records);
    Ok(CrossMapResult {
        from,
        to,
        records: sweep.records,
        convergence,
    })
}

/// Difference in rho between the last and first defined records.
fn convergence_delta(records: &[SkillRecord]) -> Option<f64> {
    let mut defined = records.iter().filter_map(|r| r.skill.rho());
    let first = defined.next()?;
    let last = defined.next_back()?;
    Some(last - first)
}

fn format_rho(record: &SkillRecord) -> String {
    record
        .skill
        .rho()
        .map_or("undefined".to_string(), |rho| format!("{:.2}", rho))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::PredictionResult;
    use crate::skill::Skill;
    use crate::types::SweepValue;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn correlated_series(n_tiles: usize, rho: f64) -> (Array1<f64>, Array1<f64>) {
        let c = ((1.0 - rho * rho) / 3.0).sqrt();
        let mut observed = Vec::with_capacity(3 * n_tiles);
        let mut predicted = Vec::with_capacity(3 * n_tiles);
        for _ in 0..n_tiles {
            for (x, w) in [(-1.0, 1.0), (0.0, -2.0), (1.0, 1.0)] {
                observed.push(x);
                predicted.push(rho * x + c * w);
            }
        }
        (Array1::from(observed), Array1::from(predicted))
    }

    fn base() -> PredictionConfig {
        PredictionConfig::new("sardine_anchovy_sst.csv")
            .with_columns(vec!["anchovy"])
            .with_target("np_sst")
            .with_embed_dimension(3)
            .with_library(1, 100)
            .with_prediction(1, 100)
    }

    #[test]
    fn test_lib_sizes_expansion() {
        let sizes = LibSizes::new(10, 80, 10).sizes().unwrap();
        assert_eq!(sizes, vec![10, 20, 30, 40, 50, 60, 70, 80]);

        // stop not on the grid: last size below stop
        let sizes = LibSizes::new(10, 75, 10).sizes().unwrap();
        assert_eq!(sizes.last(), Some(&70));
    }

    #[test]
    fn test_lib_sizes_zero_increment_rejected() {
        assert!(LibSizes::new(10, 80, 0).sizes().is_err());
    }

    #[test]
    fn test_cross_map_runs_both_directions() {
        // Forward map is strong and convergent, reverse is flat
        let stub = |config: &PredictionConfig| {
            let lib = config.library.len() as f64;
            let rho = if config.columns[0] == ColumnId::from("anchovy") {
                (0.3 + lib / 200.0).min(0.95)
            } else {
                0.1
            };
            let (observed, predicted) = correlated_series(8, rho);
            PredictionResult::new(observed, predicted)
        };

        let result = cross_map(&base(), &CcmOptions::default(), &stub).unwrap();

        assert_eq!(result.forward.records.len(), 8);
        assert_eq!(result.forward.records[0].value, SweepValue::Int(10));
        assert_eq!(result.forward.from, ColumnId::from("anchovy"));
        assert_eq!(result.forward.to, ColumnId::from("np_sst"));
        assert_eq!(result.reverse.from, ColumnId::from("np_sst"));
        assert_eq!(result.reverse.to, ColumnId::from("anchovy"));

        // rho grows from lib 10 (0.35) to lib 80 (0.70)
        assert!(result.forward.is_convergent());
        assert_relative_eq!(
            result.forward.convergence.unwrap(),
            0.35,
            epsilon = 1e-9
        );
        assert!(!result.reverse.is_convergent());
        assert_relative_eq!(result.reverse.convergence.unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cross_map_requires_target() {
        let config = PredictionConfig::new("x.csv").with_columns(vec!["a"]);
        let stub = |_: &PredictionConfig| {
            let (observed, predicted) = correlated_series(4, 0.5);
            PredictionResult::new(observed, predicted)
        };
        let result = cross_map(&config, &CcmOptions::default(), &stub);
        assert!(matches!(result, Err(EdmSweepError::InvalidConfig(_))));
    }

    #[test]
    fn test_cross_map_forces_simplex() {
        let smap_base = base().with_method(Method::SMap);
        let stub = |config: &PredictionConfig| {
            assert_eq!(config.method, Method::Simplex);
            let (observed, predicted) = correlated_series(4, 0.5);
            PredictionResult::new(observed, predicted)
        };
        cross_map(&smap_base, &CcmOptions::default(), &stub).unwrap();
    }

    #[test]
    fn test_convergence_skips_undefined_records() {
        let records = vec![
            SkillRecord {
                value: SweepValue::Int(10),
                skill: Skill::Undefined,
            },
            SkillRecord {
                value: SweepValue::Int(20),
                skill: Skill::Defined(crate::skill::SkillScores {
                    rho: 0.2,
                    rmse: 1.0,
                    mae: 0.8,
                }),
            },
            SkillRecord {
                value: SweepValue::Int(30),
                skill: Skill::Defined(crate::skill::SkillScores {
                    rho: 0.6,
                    rmse: 0.5,
                    mae: 0.4,
                }),
            },
        ];
        assert_relative_eq!(convergence_delta(&records).unwrap(), 0.4, epsilon = 1e-12);
        assert_eq!(convergence_delta(&records[..2]), None);
    }
}
