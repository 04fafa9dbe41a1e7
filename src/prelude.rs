pub use crate::data_structs::typedef::*;
pub use crate::data_structs::{
    ChromOffsetTable,
    ChromSpan,
    FlatSignal,
    FragmentSet,
    IntervalRecord,
    NameIndex,
    NormalizeMode,
    ResampledMatrix,
    SmoothingKind,
    Strand,
};
pub use crate::error::{
    ProfileError,
    Result,
};
pub use crate::io::{
    read_bed_intervals,
    read_chrom_sizes,
    read_fai_lengths,
    read_fasta_sequences,
    read_gff_intervals,
    write_bed_intervals,
    write_fragments_tsv,
    write_matrix_tsv,
    BedGraphSource,
    ChromLengths,
    GffFilter,
    InMemorySource,
    SignalSource,
};
pub use crate::tools::assemble::{
    assemble,
    assemble_all,
};
pub use crate::tools::condition::{
    center_normalize,
    remap_normalize,
    smooth,
    smooth_symmetric,
};
pub use crate::tools::extract::{
    extract,
    extract_all,
    extract_fragment,
};
pub use crate::tools::pipeline::{
    Assembled,
    Conditioned,
    Extracted,
    ProfileConfig,
    ProfileOutput,
    ProfilePipeline,
    Resampled,
    Smoothing,
    TrackProfile,
    TrackStats,
};
pub use crate::tools::preprocess::{
    cancel_dimer_noise,
    peak_detect,
    EdgeMode,
};
pub use crate::tools::random::random_fragments;
pub use crate::tools::resample::{
    resample,
    resample_all,
    TargetLength,
};
