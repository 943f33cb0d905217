//! # caterpillar-ssa
//!
//! Singular Spectrum Analysis: decompose a univariate series into additive
//! components (trend, oscillations, noise) and reconstruct any subset of them.
//!
//! ## Analysis Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["SeriesInput"] -->|"TryFrom"| B["TimeSeries"]
//!     B -->|"embed(&ts, L)?"| C["TrajectoryMatrix"]
//!     C -->|"decompose(&traj)?"| D["SvdResult"]
//!     D -->|"diagonal averaging"| E["ComponentsTable"]
//!     E --> F[".reconstruct(sel)?"]
//!     E -->|"w_correlation(&table, L)?"| G["WCorrelationMatrix"]
//! ```
//!
//! [`Ssa::new`] runs the whole pipeline; the free functions expose each stage.
//!
//! ## Memory Modes
//!
//! | Mode | Keeps `V` | Keeps elementary matrices | Peak memory |
//! |------|-----------|---------------------------|-------------|
//! | [`MemoryMode::Saving`] (default) | no | no | `O(L * K)` |
//! | [`MemoryMode::Retain`] | yes | yes | `O(d * L * K)` |
//!
//! ## Quick Start
//!
//! ```ignore
//! use caterpillar_ssa::{Ssa, SsaConfig};
//!
//! let ssa = Ssa::new(data, &SsaConfig::new(20))?;
//! println!("rank = {}", ssa.rank());
//!
//! let trend = ssa.reconstruct(0)?;
//! let periodic = ssa.reconstruct([1, 2])?;
//! let noise = ssa.reconstruct(5..)?;
//! let wcorr = ssa.w_correlation()?;
//! ```

mod components;
mod config;
mod embed;
mod error;
mod hankel;
mod reconstruct;
mod retained;
mod series;
mod ssa;
mod svd;
mod wcorr;

pub use components::{ComponentsTable, component_name};
pub use config::{MemoryMode, SsaConfig};
pub use embed::{TrajectoryMatrix, embed, max_window_length, validate_window_length};
pub use error::SsaError;
pub use hankel::{diagonal_average, elementary_matrix};
pub use reconstruct::{ComponentGroup, ComponentSelection, GroupedReconstruction};
pub use retained::{NotRetainedReason, Retained};
pub use series::{SeriesIndex, SeriesInput, TimeSeries};
pub use ssa::Ssa;
pub use svd::{SvdResult, decompose, decompose_with_budget};
pub use wcorr::{WCorrelationMatrix, w_correlation, wcorr_weights};
