//! Optional decomposition artefacts that depend on the memory mode.

/// Why an artefact was not kept after decomposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotRetainedReason {
    /// The decomposition ran in [`MemoryMode::Saving`](crate::MemoryMode::Saving).
    /// Re-run with [`MemoryMode::Retain`](crate::MemoryMode::Retain) to obtain it.
    MemorySaving,
}

impl std::fmt::Display for NotRetainedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemorySaving => {
                write!(f, "not retained in memory-saving mode; re-run in retain mode")
            }
        }
    }
}

/// An artefact that is either available or deliberately not computed.
///
/// Absence is not an error: it only tells the caller which mode to use to
/// obtain the value.
#[derive(Clone, Debug, PartialEq)]
pub enum Retained<T> {
    /// The artefact was kept.
    Available(T),
    /// The artefact was not kept, for the given reason.
    NotRetained(NotRetainedReason),
}

impl<T> Retained<T> {
    /// Returns a reference to the artefact, if it was kept.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::NotRetained(_) => None,
        }
    }

    /// Returns `true` if the artefact was kept.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Returns the reason the artefact was not kept, if any.
    pub fn reason(&self) -> Option<NotRetainedReason> {
        match self {
            Self::Available(_) => None,
            Self::NotRetained(reason) => Some(*reason),
        }
    }

    /// Converts `&Retained<T>` into `Retained<&T>`.
    pub fn as_ref(&self) -> Retained<&T> {
        match self {
            Self::Available(value) => Retained::Available(value),
            Self::NotRetained(reason) => Retained::NotRetained(*reason),
        }
    }

    /// Converts into an `Option`, discarding the reason.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Available(value) => Some(value),
            Self::NotRetained(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_accessors() {
        let r = Retained::Available(3);
        assert!(r.is_available());
        assert_eq!(r.get(), Some(&3));
        assert_eq!(r.reason(), None);
        assert_eq!(r.as_ref(), Retained::Available(&3));
        assert_eq!(r.into_option(), Some(3));
    }

    #[test]
    fn not_retained_accessors() {
        let r: Retained<Vec<f64>> = Retained::NotRetained(NotRetainedReason::MemorySaving);
        assert!(!r.is_available());
        assert_eq!(r.get(), None);
        assert_eq!(r.reason(), Some(NotRetainedReason::MemorySaving));
        assert_eq!(r.into_option(), None);
    }

    #[test]
    fn reason_display() {
        assert_eq!(
            NotRetainedReason::MemorySaving.to_string(),
            "not retained in memory-saving mode; re-run in retain mode"
        );
    }
}
