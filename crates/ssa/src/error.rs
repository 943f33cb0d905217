//! Error types for the caterpillar-ssa crate.

/// Error type for all fallible operations in the caterpillar-ssa crate.
///
/// Covers input validation, window-length checks, factorization failures,
/// component selection and w-correlation normalization. Every variant is
/// deterministic: repeating the call with the same input yields the same error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SsaError {
    /// Returned when a dynamic series value is not one of the recognized shapes.
    #[error(
        "unsupported time series input: {0} (expected a numeric array, a labeled series, or a numeric list)"
    )]
    UnsupportedInputType(String),

    /// Returned when the input series has no observations.
    #[error("time series is empty")]
    EmptySeries,

    /// Returned when the input data contains non-finite values (NaN or infinity).
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when a labeled series has a different number of labels and values.
    #[error("index length {index} does not match value length {values}")]
    IndexLengthMismatch {
        /// Number of index labels.
        index: usize,
        /// Number of values.
        values: usize,
    },

    /// Returned when the window length lies outside `[2, N/2]`.
    #[error("window length {window} must be in [2, {max}] for a series of length {len}")]
    InvalidWindowLength {
        /// Window length that was requested.
        window: usize,
        /// Length of the series.
        len: usize,
        /// Largest admissible window length (`N / 2`, floored).
        max: usize,
    },

    /// Returned when the factorization iteration budget is zero.
    #[error("SVD iteration budget must be at least 1")]
    InvalidIterationBudget,

    /// Returned when the singular value decomposition cannot be computed.
    #[error("decomposition failed: {0}")]
    DecompositionFailed(String),

    /// Returned when a selection references a component that does not exist.
    #[error("component index {index} out of range for rank {rank}")]
    IndexOutOfRange {
        /// Component index that was requested.
        index: usize,
        /// Number of available components.
        rank: usize,
    },

    /// Returned when a component has zero weighted norm during w-correlation.
    #[error("component {index} has zero weighted norm")]
    DegenerateComponent {
        /// Index of the degenerate component.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_unsupported_input_type() {
        let err = SsaError::UnsupportedInputType("string".into());
        assert_eq!(
            err.to_string(),
            "unsupported time series input: string (expected a numeric array, a labeled series, or a numeric list)"
        );
    }

    #[test]
    fn error_empty_series() {
        assert_eq!(SsaError::EmptySeries.to_string(), "time series is empty");
    }

    #[test]
    fn error_non_finite_data() {
        let err = SsaError::NonFiniteData;
        assert_eq!(err.to_string(), "input data contains non-finite values");
    }

    #[test]
    fn error_index_length_mismatch() {
        let err = SsaError::IndexLengthMismatch {
            index: 4,
            values: 5,
        };
        assert_eq!(
            err.to_string(),
            "index length 4 does not match value length 5"
        );
    }

    #[test]
    fn error_invalid_window_length() {
        let err = SsaError::InvalidWindowLength {
            window: 51,
            len: 100,
            max: 50,
        };
        assert_eq!(
            err.to_string(),
            "window length 51 must be in [2, 50] for a series of length 100"
        );
    }

    #[test]
    fn error_invalid_iteration_budget() {
        assert_eq!(
            SsaError::InvalidIterationBudget.to_string(),
            "SVD iteration budget must be at least 1"
        );
    }

    #[test]
    fn error_decomposition_failed() {
        let err = SsaError::DecompositionFailed("no convergence".into());
        assert_eq!(err.to_string(), "decomposition failed: no convergence");
    }

    #[test]
    fn error_index_out_of_range() {
        let err = SsaError::IndexOutOfRange { index: 5, rank: 3 };
        assert_eq!(
            err.to_string(),
            "component index 5 out of range for rank 3"
        );
    }

    #[test]
    fn error_degenerate_component() {
        let err = SsaError::DegenerateComponent { index: 2 };
        assert_eq!(err.to_string(), "component 2 has zero weighted norm");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<SsaError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<SsaError>();
    }
}
