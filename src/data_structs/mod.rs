//! Core data types: the flat genome-wide signal, its chromosome offset
//! table, interval records and the fragment containers produced by
//! extraction and resampling.

pub mod enums;
mod flat_signal;
mod fragments;
mod interval;
mod offset;
pub mod typedef;

pub use enums::{
    NormalizeMode,
    SmoothingKind,
    Strand,
};
pub use flat_signal::FlatSignal;
pub use fragments::{
    FragmentSet,
    NameIndex,
    ResampledMatrix,
};
pub use interval::IntervalRecord;
pub use offset::{
    ChromOffsetTable,
    ChromSpan,
};
