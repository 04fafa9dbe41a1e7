//! # trackprofile
//!
//! `trackprofile` turns per-chromosome signal tracks (coverage, damage or
//! any other value indexed by genomic position) into comparable,
//! fixed-length profiles of genomic features.
//!
//! Each track is concatenated into one flat genome-wide signal in a
//! caller-supplied chromosome order, with the start offset of every
//! chromosome recorded in a [`ChromOffsetTable`]. The flat signal can be
//! smoothed and normalized as a whole; afterwards one fragment per
//! annotated interval is cut out of it, reversed for features on the
//! reverse strand, and finally interpolated onto a common length.
//!
//! ## Structure
//!
//! * [`data_structs`]: the flat signal, offset table, interval records and
//!   fragment containers.
//! * [`io`]: the [`SignalSource`] trait with in-memory and bedGraph
//!   implementations, plus readers for chromosome sizes, FASTA indexes,
//!   BED/GFF annotations and FASTA sequences.
//! * [`tools`]: assembly, conditioning, extraction, resampling, the staged
//!   [`ProfilePipeline`] and preprocessing filters.
//! * [`utils`]: the shared rayon thread pool and numeric helpers.
//!
//! Number of threads to be used can be configured with setting
//! `TRACKPROFILE_NUM_THREADS` environment variable.
//!
//! ## Example
//!
//! ```
//! use trackprofile::prelude::*;
//!
//! let source = InMemorySource::new()
//!     .with_chrom("chrI", vec![0., 1., 0., 2., 3., 3., 3., 3., 4.])
//!     .with_chrom("chrII", vec![3., 2., 1., 0.]);
//! let genes = vec![
//!     IntervalRecord::new("chrI", 3, 8).with_name(Some("YAL001C".into())),
//!     IntervalRecord::new("chrII", 0, 4).with_strand(Strand::Reverse),
//! ];
//! let config = ProfileConfig::default()
//!     .with_target_length(Some(TargetLength::Fixed(10)));
//!
//! let output = ProfilePipeline::new(config)
//!     .run(&[source], &["chrI", "chrII"], &genes)
//!     .unwrap();
//! let matrix = output.tracks[0].as_matrix().unwrap();
//! assert_eq!(matrix.data().dim(), (2, 10));
//! assert_eq!(output.offsets.offset("chrII"), Some(9));
//! ```

pub mod data_structs;
pub mod error;
pub mod io;
pub mod prelude;
pub mod tools;
pub mod utils;

pub use data_structs::{
    ChromOffsetTable,
    FlatSignal,
    IntervalRecord,
};
pub use error::{
    ProfileError,
    Result,
};
pub use io::SignalSource;
pub use tools::pipeline::ProfilePipeline;
