//! Error types
//!
//! The engine has almost nothing to report: bad selections are `None` and
//! coincident pucks are nudged apart. What remains is bad configuration and
//! numeric faults caught at the end of a tick.

use thiserror::Error;

use crate::sim::PieceId;

/// Rejected tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl TuningError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Fault detected while advancing the simulation
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("piece {0:?} has a non-finite position or velocity")]
    NonFinite(PieceId),
    #[error("launch requested for unknown piece {0:?}")]
    UnknownPiece(PieceId),
}
