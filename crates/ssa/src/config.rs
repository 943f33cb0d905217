//! Decomposition configuration.

use crate::embed::validate_window_length;
use crate::error::SsaError;

/// How elementary matrices are handled during diagonal averaging.
///
/// Both modes produce identical components; the choice only trades memory
/// for the ability to inspect `V` and the elementary matrices afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemoryMode {
    /// Recompute each elementary matrix transiently and keep neither `V`
    /// nor the elementary matrices. Peak memory `O(L * K)`.
    #[default]
    Saving,
    /// Materialize all `d` elementary matrices (`O(d * L * K)`) and keep `V`.
    Retain,
}

/// Configuration for [`Ssa::new`](crate::Ssa::new).
///
/// # Example
///
/// ```ignore
/// use caterpillar_ssa::{MemoryMode, SsaConfig};
///
/// let config = SsaConfig::new(20).with_memory_mode(MemoryMode::Retain);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SsaConfig {
    window_length: usize,
    memory_mode: MemoryMode,
    max_svd_iterations: Option<usize>,
}

impl SsaConfig {
    /// Creates a configuration with window length `L`.
    ///
    /// Defaults: [`MemoryMode::Saving`], SVD iteration budget scaled to the
    /// matrix size.
    pub fn new(window_length: usize) -> Self {
        Self {
            window_length,
            memory_mode: MemoryMode::default(),
            max_svd_iterations: None,
        }
    }

    /// Sets the memory mode.
    pub fn with_memory_mode(mut self, mode: MemoryMode) -> Self {
        self.memory_mode = mode;
        self
    }

    /// Shorthand for [`MemoryMode::Retain`] (`true`) or [`MemoryMode::Saving`] (`false`).
    pub fn with_retain(self, retain: bool) -> Self {
        self.with_memory_mode(if retain {
            MemoryMode::Retain
        } else {
            MemoryMode::Saving
        })
    }

    /// Caps the number of QR sweeps of the eigensolver behind the SVD.
    ///
    /// The budget must be at least 1; [`validate`](Self::validate) rejects 0.
    pub fn with_max_svd_iterations(mut self, iterations: usize) -> Self {
        self.max_svd_iterations = Some(iterations);
        self
    }

    /// Returns the window length `L`.
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Returns the memory mode.
    pub fn memory_mode(&self) -> MemoryMode {
        self.memory_mode
    }

    /// Returns the explicit SVD iteration budget, if set.
    pub fn max_svd_iterations(&self) -> Option<usize> {
        self.max_svd_iterations
    }

    /// Checks the window length against a series of length `n` and the
    /// iteration budget.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SsaError::InvalidWindowLength`] | `L` outside `[2, n/2]` |
    /// | [`SsaError::InvalidIterationBudget`] | an explicit budget of 0 |
    pub fn validate(&self, n: usize) -> Result<(), SsaError> {
        validate_window_length(self.window_length, n)?;
        if self.max_svd_iterations == Some(0) {
            return Err(SsaError::InvalidIterationBudget);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = SsaConfig::new(12);
        assert_eq!(config.window_length(), 12);
        assert_eq!(config.memory_mode(), MemoryMode::Saving);
        assert_eq!(config.max_svd_iterations(), None);
    }

    #[test]
    fn config_builder() {
        let config = SsaConfig::new(5)
            .with_memory_mode(MemoryMode::Retain)
            .with_max_svd_iterations(50);
        assert_eq!(config.memory_mode(), MemoryMode::Retain);
        assert_eq!(config.max_svd_iterations(), Some(50));
    }

    #[test]
    fn config_retain_flag() {
        assert_eq!(
            SsaConfig::new(5).with_retain(true).memory_mode(),
            MemoryMode::Retain
        );
        assert_eq!(
            SsaConfig::new(5).with_retain(false).memory_mode(),
            MemoryMode::Saving
        );
    }

    #[test]
    fn config_validate() {
        assert!(SsaConfig::new(10).validate(20).is_ok());
        assert!(SsaConfig::new(11).validate(20).is_err());
        assert!(SsaConfig::new(1).validate(20).is_err());
    }

    #[test]
    fn config_rejects_zero_budget() {
        let config = SsaConfig::new(5).with_max_svd_iterations(0);
        assert_eq!(config.validate(20), Err(SsaError::InvalidIterationBudget));
        assert!(SsaConfig::new(5).with_max_svd_iterations(1).validate(20).is_ok());
    }

    #[test]
    fn config_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<SsaConfig>();
    }
}
