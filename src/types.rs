//! Core configuration types for sweep diagnostics.
//!
//! A [`PredictionConfig`] describes one run of the external EDM prediction
//! primitive; a [`SweepSpec`] names the parameter being varied and its
//! candidate values. Sweeps derive one config per candidate by overriding the
//! swept field in a base config.

use crate::error::{EdmSweepError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a data column by name or by 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    /// Column referenced by header name.
    Name(String),
    /// Column referenced by 1-based index.
    Index(usize),
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnId::Name(name) => write!(f, "{}", name),
            ColumnId::Index(i) => write!(f, "#{}", i),
        }
    }
}

impl From<&str> for ColumnId {
    fn from(name: &str) -> Self {
        ColumnId::Name(name.to_string())
    }
}

impl From<String> for ColumnId {
    fn from(name: String) -> Self {
        ColumnId::Name(name)
    }
}

impl From<usize> for ColumnId {
    fn from(index: usize) -> Self {
        ColumnId::Index(index)
    }
}

/// EDM projection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Nearest-neighbor simplex projection.
    Simplex,
    /// Locally weighted linear regression, localized by theta.
    SMap,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Simplex => write!(f, "Simplex"),
            Method::SMap => write!(f, "SMap"),
        }
    }
}

/// 1-based inclusive row range into the input series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    /// First row (1-based).
    pub start: usize,
    /// Last row, inclusive.
    pub stop: usize,
}

impl IndexRange {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Number of rows covered by the range.
    pub fn len(&self) -> usize {
        if self.stop < self.start {
            0
        } else {
            self.stop - self.start + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self, what: &str) -> Result<()> {
        if self.start < 1 {
            return Err(EdmSweepError::InvalidConfig(format!(
                "{} range start must be at least 1, got {}",
                what, self.start
            )));
        }
        if self.stop < self.start {
            return Err(EdmSweepError::InvalidConfig(format!(
                "{} range [{}, {}] is inverted",
                what, self.start, self.stop
            )));
        }
        Ok(())
    }
}

/// Immutable configuration for one run of the external prediction primitive.
///
/// Mirrors the recognized option surface of the EDM tools: input source,
/// columns and target, method, embedding dimension E, forecast horizon Tp,
/// S-Map theta, nearest-neighbor count, time delay tau, and library /
/// prediction row ranges. The `plot` flag is a presentation hint and never
/// affects computed results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Reference to the input time series (path or identifier); read by the
    /// prediction primitive, not by this crate.
    pub source: String,
    /// Columns to embed, or embedding columns when `embedded` is set.
    pub columns: Vec<ColumnId>,
    /// Target column for the projection.
    pub target: Option<ColumnId>,
    /// Projection method.
    pub method: Method,
    /// Embedding dimension E.
    pub embed_dimension: usize,
    /// Forecast horizon Tp in steps.
    pub forecast_horizon: i32,
    /// S-Map localization parameter; required when `method` is `SMap`.
    pub theta: Option<f64>,
    /// Nearest-neighbor count; the primitive defaults to E + 1 for Simplex.
    pub k_nn: Option<usize>,
    /// Time delay between embedding coordinates.
    pub tau: i32,
    /// Input is already a delay embedding.
    pub embedded: bool,
    /// Library (training) row range.
    pub library: IndexRange,
    /// Prediction (evaluation) row range.
    pub prediction: IndexRange,
    /// Presentation hint; ignored by evaluation.
    pub plot: bool,
}

impl PredictionConfig {
    /// Create a config for `source` with the original tool defaults:
    /// Simplex, E = 1, Tp = 0, tau = 1, library and prediction rows 1..=10.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            columns: Vec::new(),
            target: None,
            method: Method::Simplex,
            embed_dimension: 1,
            forecast_horizon: 0,
            theta: None,
            k_nn: None,
            tau: 1,
            embedded: false,
            library: IndexRange::new(1, 10),
            prediction: IndexRange::new(1, 10),
            plot: false,
        }
    }

    pub fn with_columns<C: Into<ColumnId>>(mut self, columns: Vec<C>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target(mut self, target: impl Into<ColumnId>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_embed_dimension(mut self, e: usize) -> Self {
        self.embed_dimension = e;
        self
    }

    pub fn with_forecast_horizon(mut self, tp: i32) -> Self {
        self.forecast_horizon = tp;
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = Some(theta);
        self
    }

    pub fn with_k_nn(mut self, k_nn: usize) -> Self {
        self.k_nn = Some(k_nn);
        self
    }

    pub fn with_tau(mut self, tau: i32) -> Self {
        self.tau = tau;
        self
    }

    pub fn with_embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    pub fn with_library(mut self, start: usize, stop: usize) -> Self {
        self.library = IndexRange::new(start, stop);
        self
    }

    pub fn with_prediction(mut self, start: usize, stop: usize) -> Self {
        self.prediction = IndexRange::new(start, stop);
        self
    }

    pub fn with_plot(mut self, plot: bool) -> Self {
        self.plot = plot;
        self
    }

    /// Check the config for missing or contradictory fields.
    pub fn validate(&self) -> Result<()> {
        if self.embed_dimension < 1 {
            return Err(EdmSweepError::InvalidConfig(
                "embedding dimension E must be at least 1".to_string(),
            ));
        }
        if !self.embedded && self.columns.is_empty() {
            return Err(EdmSweepError::InvalidConfig(
                "columns are required when the input is not an embedding".to_string(),
            ));
        }
        self.library.validate("library")?;
        self.prediction.validate("prediction")?;

        if self.method == Method::SMap {
            match self.theta {
                None => {
                    return Err(EdmSweepError::InvalidConfig(
                        "theta is required with method SMap".to_string(),
                    ));
                }
                Some(theta) if !theta.is_finite() || theta < 0.0 => {
                    return Err(EdmSweepError::InvalidConfig(format!(
                        "theta must be finite and non-negative, got {}",
                        theta
                    )));
                }
                Some(_) => {}
            }
            if let Some(k_nn) = self.k_nn {
                if k_nn <= self.embed_dimension {
                    return Err(EdmSweepError::InvalidConfig(format!(
                        "k_NN must be at least E + 1 with method SMap, got k_NN = {} with E = {}",
                        k_nn, self.embed_dimension
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The parameter a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepParameter {
    EmbedDimension,
    ForecastHorizon,
    Theta,
    LibrarySize,
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepParameter::EmbedDimension => write!(f, "E"),
            SweepParameter::ForecastHorizon => write!(f, "Tp"),
            SweepParameter::Theta => write!(f, "theta"),
            SweepParameter::LibrarySize => write!(f, "lib_size"),
        }
    }
}

/// One swept candidate value, as recorded in sweep output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SweepValue {
    Int(i64),
    Float(f64),
}

impl SweepValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            SweepValue::Int(v) => *v as f64,
            SweepValue::Float(v) => *v,
        }
    }
}

impl fmt::Display for SweepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepValue::Int(v) => write!(f, "{}", v),
            SweepValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// The swept parameter and its ordered, non-empty candidate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SweepSpec {
    /// Vary the embedding dimension E.
    EmbedDimension(Vec<usize>),
    /// Vary the forecast horizon Tp.
    ForecastHorizon(Vec<i32>),
    /// Vary the S-Map localization theta.
    Theta(Vec<f64>),
    /// Vary the library size, anchored at the base library start row.
    LibrarySize(Vec<usize>),
}

impl SweepSpec {
    pub fn parameter(&self) -> SweepParameter {
        match self {
            SweepSpec::EmbedDimension(_) => SweepParameter::EmbedDimension,
            SweepSpec::ForecastHorizon(_) => SweepParameter::ForecastHorizon,
            SweepSpec::Theta(_) => SweepParameter::Theta,
            SweepSpec::LibrarySize(_) => SweepParameter::LibrarySize,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SweepSpec::EmbedDimension(values) => values.len(),
            SweepSpec::ForecastHorizon(values) => values.len(),
            SweepSpec::Theta(values) => values.len(),
            SweepSpec::LibrarySize(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The candidate value at position `i`.
    pub fn value(&self, i: usize) -> SweepValue {
        match self {
            SweepSpec::EmbedDimension(values) => SweepValue::Int(values[i] as i64),
            SweepSpec::ForecastHorizon(values) => SweepValue::Int(values[i] as i64),
            SweepSpec::Theta(values) => SweepValue::Float(values[i]),
            SweepSpec::LibrarySize(values) => SweepValue::Int(values[i] as i64),
        }
    }

    /// Derive the config for candidate `i` by overriding the swept field in
    /// `base`.
    ///
    /// Sweeping E with method Simplex and no explicit `k_nn` also carries
    /// `k_nn = E + 1`, matching the embedding-dimension tool.
    pub fn derive(&self, base: &PredictionConfig, i: usize) -> PredictionConfig {
        let mut config = base.clone();
        match self {
            SweepSpec::EmbedDimension(values) => {
                config.embed_dimension = values[i];
                if config.method == Method::Simplex && base.k_nn.is_none() {
                    config.k_nn = Some(values[i] + 1);
                }
            }
            SweepSpec::ForecastHorizon(values) => {
                config.forecast_horizon = values[i];
            }
            SweepSpec::Theta(values) => {
                config.theta = Some(values[i]);
            }
            SweepSpec::LibrarySize(values) => {
                config.library = IndexRange::new(
                    base.library.start,
                    (base.library.start + values[i]).saturating_sub(1),
                );
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PredictionConfig {
        PredictionConfig::new("tentmap.csv")
            .with_columns(vec!["TentMap"])
            .with_target("TentMap")
            .with_library(1, 100)
            .with_prediction(201, 500)
    }

    #[test]
    fn test_index_range_len() {
        assert_eq!(IndexRange::new(1, 10).len(), 10);
        assert_eq!(IndexRange::new(201, 500).len(), 300);
        assert_eq!(IndexRange::new(5, 4).len(), 0);
    }

    #[test]
    fn test_validate_defaults() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_e() {
        let config = base().with_embed_dimension(0);
        assert!(matches!(
            config.validate(),
            Err(EdmSweepError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_columns() {
        let config = PredictionConfig::new("x.csv");
        assert!(config.validate().is_err());

        // An embedded input does not need columns
        let config = PredictionConfig::new("x.csv").with_embedded(true);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_smap_requires_theta() {
        let config = base().with_method(Method::SMap);
        assert!(matches!(
            config.validate(),
            Err(EdmSweepError::InvalidConfig(_))
        ));
        assert!(base().with_method(Method::SMap).with_theta(2.0).validate().is_ok());
    }

    #[test]
    fn test_validate_smap_rejects_negative_theta() {
        let config = base().with_method(Method::SMap).with_theta(-0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_smap_k_nn_bound() {
        let config = base()
            .with_method(Method::SMap)
            .with_theta(1.0)
            .with_embed_dimension(3)
            .with_k_nn(3);
        assert!(config.validate().is_err());

        let config = config.with_k_nn(4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_inverted_range() {
        let config = base().with_library(100, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_derive_embed_dimension_sets_k_nn() {
        let spec = SweepSpec::EmbedDimension(vec![1, 2, 3]);
        let derived = spec.derive(&base(), 2);
        assert_eq!(derived.embed_dimension, 3);
        assert_eq!(derived.k_nn, Some(4));
    }

    #[test]
    fn test_derive_embed_dimension_keeps_explicit_k_nn() {
        let spec = SweepSpec::EmbedDimension(vec![5]);
        let derived = spec.derive(&base().with_k_nn(2), 0);
        assert_eq!(derived.k_nn, Some(2));
    }

    #[test]
    fn test_derive_theta() {
        let spec = SweepSpec::Theta(vec![0.01, 0.1]);
        let smap = base().with_method(Method::SMap);
        let derived = spec.derive(&smap, 1);
        assert_eq!(derived.theta, Some(0.1));
    }

    #[test]
    fn test_derive_library_size() {
        let spec = SweepSpec::LibrarySize(vec![10, 20]);
        let derived = spec.derive(&base(), 1);
        assert_eq!(derived.library, IndexRange::new(1, 20));
        assert_eq!(derived.library.len(), 20);
    }

    #[test]
    fn test_derive_library_size_zero_is_invalid() {
        let spec = SweepSpec::LibrarySize(vec![0]);
        let derived = spec.derive(&base(), 0);
        assert!(derived.validate().is_err());
    }

    #[test]
    fn test_sweep_value_display() {
        assert_eq!(SweepValue::Int(3).to_string(), "3");
        assert_eq!(SweepValue::Float(0.75).to_string(), "0.75");
        assert_eq!(SweepParameter::Theta.to_string(), "theta");
    }
}
