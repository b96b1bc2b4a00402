// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Store health as reported on `/health`

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of a store liveness probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum HealthStatus {
    /// Store answered the probe
    Up,
    /// Store could not be reached
    Down {
        /// Probe failure, as reported by the store
        reason: String,
    },
}

impl HealthStatus {
    /// `true` unless the probe failed
    pub fn is_up(&self) -> bool {
        matches!(self, HealthStatus::Up)
    }

    /// Failure reason, if the probe failed
    pub fn reason(&self) -> Option<&str> {
        match self {
            HealthStatus::Up => None,
            HealthStatus::Down { reason } => Some(reason),
        }
    }
}
