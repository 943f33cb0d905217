//! Component selection and grouped reconstruction.

use std::ops::{Range, RangeFrom, RangeInclusive};

use crate::components::ComponentsTable;
use crate::error::SsaError;
use crate::series::{SeriesIndex, TimeSeries};

/// A set of component indices to sum during reconstruction.
///
/// Converts from `usize`, `Vec<usize>`, `&[usize]`, `[usize; N]`, `a..b`,
/// `a..=b`, and `a..` so callers can write `ssa.reconstruct(0)`,
/// `ssa.reconstruct([1, 2])` or `ssa.reconstruct(5..)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentSelection {
    /// One component.
    Single(usize),
    /// An explicit list of components. Duplicates are summed once per occurrence.
    Set(Vec<usize>),
    /// A contiguous half-open range of components.
    Range(Range<usize>),
    /// A contiguous inclusive range of components.
    Inclusive(RangeInclusive<usize>),
    /// All components from `start` up to the rank.
    Tail(usize),
}

impl ComponentSelection {
    /// Resolves the selection against a table of `rank` components.
    ///
    /// # Errors
    ///
    /// Returns [`SsaError::IndexOutOfRange`] for any index `>= rank`, for a
    /// range ending beyond `rank`, or for a tail starting beyond `rank`.
    pub fn resolve(&self, rank: usize) -> Result<Vec<usize>, SsaError> {
        let check = |index: usize| {
            if index < rank {
                Ok(index)
            } else {
                Err(SsaError::IndexOutOfRange { index, rank })
            }
        };
        match self {
            Self::Single(i) => Ok(vec![check(*i)?]),
            Self::Set(indices) => indices.iter().map(|&i| check(i)).collect(),
            Self::Range(range) => {
                if range.end > rank {
                    return Err(SsaError::IndexOutOfRange {
                        index: range.end - 1,
                        rank,
                    });
                }
                Ok(range.clone().collect())
            }
            Self::Inclusive(range) => {
                if range.is_empty() {
                    return Ok(Vec::new());
                }
                check(*range.end())?;
                Ok(range.clone().collect())
            }
            Self::Tail(start) => {
                if *start > rank {
                    return Err(SsaError::IndexOutOfRange {
                        index: *start,
                        rank,
                    });
                }
                Ok((*start..rank).collect())
            }
        }
    }
}

impl From<usize> for ComponentSelection {
    fn from(i: usize) -> Self {
        Self::Single(i)
    }
}

impl From<Vec<usize>> for ComponentSelection {
    fn from(indices: Vec<usize>) -> Self {
        Self::Set(indices)
    }
}

impl From<&[usize]> for ComponentSelection {
    fn from(indices: &[usize]) -> Self {
        Self::Set(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for ComponentSelection {
    fn from(indices: [usize; N]) -> Self {
        Self::Set(indices.to_vec())
    }
}

impl From<Range<usize>> for ComponentSelection {
    fn from(range: Range<usize>) -> Self {
        Self::Range(range)
    }
}

impl From<RangeInclusive<usize>> for ComponentSelection {
    fn from(range: RangeInclusive<usize>) -> Self {
        Self::Inclusive(range)
    }
}

impl From<RangeFrom<usize>> for ComponentSelection {
    fn from(range: RangeFrom<usize>) -> Self {
        Self::Tail(range.start)
    }
}

/// A named, caller-chosen group of components (e.g. `trend = [0]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentGroup {
    name: String,
    selection: ComponentSelection,
}

impl ComponentGroup {
    /// Creates a new group.
    pub fn new(name: impl Into<String>, selection: impl Into<ComponentSelection>) -> Self {
        Self {
            name: name.into(),
            selection: selection.into(),
        }
    }

    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the selected components.
    pub fn selection(&self) -> &ComponentSelection {
        &self.selection
    }
}

/// One reconstructed series per [`ComponentGroup`], in the order given.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupedReconstruction {
    index: SeriesIndex,
    groups: Vec<(String, Vec<f64>)>,
}

impl GroupedReconstruction {
    /// Reconstructs every group from `table`.
    ///
    /// # Errors
    ///
    /// Returns [`SsaError::IndexOutOfRange`] from the first group that
    /// references a missing component.
    pub fn from_table(
        table: &ComponentsTable,
        groups: &[ComponentGroup],
    ) -> Result<Self, SsaError> {
        let groups = groups
            .iter()
            .map(|group| {
                let series = table.reconstruct(group.selection.clone())?;
                let (values, _) = series.into_parts();
                Ok((group.name.clone(), values))
            })
            .collect::<Result<Vec<_>, SsaError>>()?;
        Ok(Self {
            index: table.index().clone(),
            groups,
        })
    }

    /// Returns the row index shared with the original series.
    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    /// Returns the number of groups.
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    /// Returns the group names in order.
    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the reconstruction of the group called `name`.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Returns an iterator over `(name, values)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.groups
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns the reconstruction of group `i` as a [`TimeSeries`].
    pub fn series(&self, i: usize) -> Option<TimeSeries> {
        self.groups
            .get(i)
            .map(|(_, values)| TimeSeries::from_parts(values.clone(), self.index.clone()))
    }
}
