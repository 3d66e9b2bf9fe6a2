//! Configuration for the choice probability computation.

use serde::{Deserialize, Serialize};

use crate::error::{DcmError, Result};

/// Constant added to every max-centred utility before exponentiation.
///
/// Any finite shift cancels in the normalization; `1.0` keeps every exponent in
/// `(-inf, 1]`.
pub const DEFAULT_EXPONENT_SHIFT: f64 = 1.0;

/// Options applied by a [`DcmTable`](crate::DcmTable).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DcmOptions {
    /// Shift applied to `score - max_score` before `exp`.
    pub exponent_shift: f64,
}

impl Default for DcmOptions {
    fn default() -> Self {
        Self {
            exponent_shift: DEFAULT_EXPONENT_SHIFT,
        }
    }
}

impl DcmOptions {
    /// Override the exponent shift while preserving other defaults.
    pub fn with_exponent_shift(mut self, shift: f64) -> Self {
        self.exponent_shift = shift;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.exponent_shift.is_finite() {
            return Err(DcmError::InvalidOption {
                name: "exponent_shift",
                value: self.exponent_shift,
            });
        }
        Ok(())
    }
}
