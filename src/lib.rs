//! voxel_visibility - Progressive voxel visibility analysis
//!
//! This crate incrementally determines which cells of a 3D sampling grid
//! are mutually visible through an occluding environment. Work is spread
//! across budgeted steps driven by the host's scheduler instead of one
//! blocking pass, so large volumes can be analyzed without freezing the
//! host application.
//!
//! # Pipeline
//!
//! 1. **Grid building**: an AABB derived from input points is decomposed
//!    into linked voxel boxes whose corners are shared between neighbors.
//! 2. **Main pass**: every grid row along X, Y, and Z is scanned with
//!    segmented long-trace line-of-sight queries.
//! 3. **Sub-sampling refinement** (optional): cells still hidden after
//!    the main pass are subdivided into a finer scratch grid and re-tested
//!    internally to recover under-sampling false negatives.
//!
//! The host supplies the scene through the [`SpatialQuery`] trait and
//! drives the run by calling [`VolumeAnalyzer::step`] once per tick.
//!
//! # Example
//!
//! ```ignore
//! use voxel_visibility::{AnalysisConfig, StepStatus, VolumeAnalyzer};
//!
//! let config = AnalysisConfig::new()
//!     .with_counts(16, 16, 8)
//!     .with_sub_sampling(true);
//! let mut analyzer = VolumeAnalyzer::new(config);
//! analyzer.start_analysis(&region_points)?;
//!
//! // Per scheduling tick:
//! if analyzer.step(&mut scene) == StepStatus::Completed {
//!     println!("visibility: {:.1}%", analyzer.visibility_percentage());
//! }
//! ```

pub mod types;
pub use types::{Aabb3, TraceResult};

// Shared corner points and the boxes that reference them
pub mod arena;
pub mod voxel;
pub use arena::{PointArena, PointHandle};
pub use voxel::{Corner, VoxelBox};

// Grid building and indexing
pub mod grid;
pub use grid::VoxelGrid;

// External capability seams
pub mod query;
pub use query::{DebugDraw, DrawColor, NoDebugDraw, SpatialQuery};

// Configuration
pub mod config;
pub use config::AnalysisConfig;

// Segmented long-trace scanning and the main-pass engine
pub mod scan;
pub mod sweep;
pub use scan::ScanPolicy;
pub use sweep::{MainPass, ScanPhase};

// Sub-sampling refinement of hidden cells
pub mod refine;
pub use refine::Refiner;

// Analysis coordinator
pub mod analyzer;
pub use analyzer::{
  AnalysisResult, HaltReason, StartError, StepStatus, VolumeAnalyzer,
};

// JSON codec for boxes and grids
pub mod json;

// Geometry helpers
pub mod geom;

#[cfg(test)]
pub(crate) mod test_world;
