//! Extract → analyze workflow.
//!
//! ## Stages
//!
//! `idle → extracting → extracted → analyzing → analyzed`, with failures
//! from either busy stage falling back to `idle`.
//!
//! ## Pieces
//!
//! - `RiskAnalysisStore` - state container and transitions
//! - `AnalysisForm` - metadata and the guard in front of `analyze`
//! - `SimulatedProgress` - cosmetic progress while a call is outstanding

mod form;
mod progress;
mod stage;
mod store;

pub use form::{
    AnalysisForm, FormError, ANALYSIS_FOCUS_OPTIONS, COMPANY_SCALES, DOCUMENT_TYPES, INDUSTRIES,
};
pub use progress::{spawn_ticker, NoProgress, ProgressTicker, SimulatedProgress, TickerHandle};
pub use stage::WorkflowStage;
pub use store::{RiskAnalysisStore, WorkflowError, WorkflowState};
