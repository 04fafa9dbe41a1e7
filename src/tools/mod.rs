//! Algorithms of the profiling pipeline and the filters around it.
//!
//! Key submodules:
//!
//! - [`assemble`]: concatenates per-chromosome tracks into one flat signal
//!   and records each chromosome's offset.
//! - [`condition`]: normalization and moving-average smoothing of whole
//!   signals.
//! - [`extract`]: strand-aware slicing of one fragment per interval.
//! - [`resample`]: interpolation of fragments onto a common length.
//! - [`pipeline`]: the staged run of all of the above.
//! - [`preprocess`]: peak detection and dimer noise filtering.
//! - [`random`]: random interval tilings for background profiles.
pub mod assemble;
pub mod condition;
pub mod extract;
pub mod pipeline;
pub mod preprocess;
pub mod random;
pub mod resample;
