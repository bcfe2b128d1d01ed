//! Tree configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};

/// Default balance factor. Gives the classic `log(n) / log(1.5)` height bound.
pub const DEFAULT_ALPHA: f64 = 2.0 / 3.0;

/// Construction-time settings for a [`ScapegoatTree`](crate::ScapegoatTree).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeConfig {
    /// Balance strictness, in `(0.5, 1.0)`. Smaller rebuilds more often.
    pub alpha: f64,
    /// Maximum number of undo entries kept. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            history_limit: None,
        }
    }
}

impl TreeConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_alpha(self.alpha)
    }
}

/// Rejects NaN and anything outside the open interval `(0.5, 1.0)`.
pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.5 && alpha < 1.0 {
        Ok(())
    } else {
        Err(TreeError::InvalidAlpha(alpha))
    }
}
