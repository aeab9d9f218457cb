//! # edmsweep
//!
//! Parameter-sweep skill diagnostics for Empirical Dynamic Modeling (EDM).
//!
//! EDM forecasts a time series from its own reconstructed state space; the
//! practical workflow is to sweep one parameter at a time and watch the
//! prediction skill (Pearson rho between observed and predicted values):
//!
//! - embedding dimension E ([`diagnostics::embed_dimension`])
//! - forecast horizon Tp ([`diagnostics::predict_decay`])
//! - S-Map localization theta ([`diagnostics::smap_nl`])
//! - library size, for Convergent Cross Mapping ([`ccm::cross_map`])
//! - variable combinations, for Multiview ensembles
//!   ([`multiview::select_and_ensemble`])
//!
//! The Simplex/S-Map prediction core itself is an external collaborator
//! reached through the [`predictor::Predictor`] trait; this crate owns the
//! sweep loops, skill scoring, and result aggregation.
//!
//! ## Example
//!
//! ```ignore
//! use edmsweep::prelude::*;
//!
//! let base = PredictionConfig::new("TentMap_rEDM.csv")
//!     .with_columns(vec!["TentMap"])
//!     .with_target("TentMap")
//!     .with_forecast_horizon(1)
//!     .with_library(1, 100)
//!     .with_prediction(201, 500);
//!
//! // `predictor` is any implementation of the EDM prediction primitive
//! let result = embed_dimension(&base, None, &predictor)?;
//! if let Some(best) = result.best {
//!     println!("optimal E = {}", best.value);
//! }
//! ```

pub mod ccm;
pub mod diagnostics;
pub mod error;
pub mod multiview;
pub mod predictor;
pub mod skill;
pub mod sweep;
pub mod types;

pub mod prelude {
    //! Convenient re-exports of commonly used types.
    pub use crate::ccm::{cross_map, CcmOptions, CcmResult, CrossMapResult, LibSizes};
    pub use crate::diagnostics::{embed_dimension, predict_decay, smap_nl, DEFAULT_THETA_GRID};
    pub use crate::error::{EdmSweepError, Result};
    pub use crate::multiview::{
        select_and_ensemble, ComboRecord, MultiviewOptions, MultiviewResult,
    };
    pub use crate::predictor::{PredictionResult, Predictor};
    pub use crate::skill::{compute_skill, Skill, SkillScores};
    pub use crate::sweep::{evaluate, SkillRecord, SweepResult};
    pub use crate::types::{
        ColumnId, IndexRange, Method, PredictionConfig, SweepParameter, SweepSpec, SweepValue,
    };
}
