#![allow(dead_code)]
use std::fs::File;
use std::path::PathBuf;

use trackprofile::prelude::*;

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

pub fn open_data(name: &str) -> File {
    File::open(data_path(name)).expect("Error opening test data file")
}

pub fn genome_lengths() -> ChromLengths {
    read_chrom_sizes(open_data("genome.sizes")).expect("Failed to read chromosome sizes")
}

pub fn bedgraph(name: &str) -> BedGraphSource {
    BedGraphSource::from_path(data_path(name), genome_lengths())
        .expect("Failed to read bedGraph track")
}
