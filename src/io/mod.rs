//! Collaborator I/O around the profiling core: signal sources, chromosome
//! length tables, annotations, reference sequences and result tables.
mod bedgraph;
mod intervals;
mod matrix;
mod reference;
mod source;

pub use bedgraph::BedGraphSource;
pub use intervals::{
    read_bed_intervals,
    read_gff_intervals,
    write_bed_intervals,
    GffFilter,
};
pub use matrix::{
    write_fragments_tsv,
    write_matrix_tsv,
};
pub use reference::{
    read_chrom_sizes,
    read_fai_lengths,
    read_fasta_sequences,
};
pub use source::{
    ChromLengths,
    InMemorySource,
    SignalSource,
};
