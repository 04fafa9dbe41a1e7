mod common;

use std::io::{
    BufRead,
    BufReader,
};

use assert_approx_eq::assert_approx_eq;
use common::{
    bedgraph,
    open_data,
};
use rstest::{
    fixture,
    rstest,
};
use trackprofile::prelude::*;

const CHROMS: [&str; 2] = ["chrI", "chrII"];

#[fixture]
fn tracks() -> Vec<BedGraphSource> {
    vec![bedgraph("track1.bedgraph"), bedgraph("track2.bedgraph")]
}

#[fixture]
#[once]
fn genes() -> Vec<IntervalRecord> {
    read_bed_intervals(open_data("genes.bed")).expect("Failed to read genes")
}

#[rstest]
fn raw_fragments_follow_strand(
    tracks: Vec<BedGraphSource>,
    genes: &Vec<IntervalRecord>,
) {
    let config = ProfileConfig::default().with_build_name_map(true);
    let output = ProfilePipeline::new(config)
        .run(&tracks, &CHROMS, genes)
        .unwrap();

    let set = output.tracks[0].as_fragments().unwrap();
    assert_eq!(set.get_by_name("geneA").unwrap(), &[1., 1., 1., 3., 3., 3.]);
    assert_eq!(
        set.get_by_name("geneB").unwrap(),
        &[2., 2., 2., 2., 2., 2., 0., 0.]
    );
    assert_eq!(set.get(2).unwrap(), &[4., 4., 4., 4., 4., 1., 1., 1., 1., 1.]);

    let second = output.tracks[1].as_fragments().unwrap();
    assert_eq!(second.get(0).unwrap(), &[1.5; 6]);
}

#[rstest]
fn every_track_profiles_every_gene(
    tracks: Vec<BedGraphSource>,
    genes: &Vec<IntervalRecord>,
) {
    let config = ProfileConfig::default()
        .with_target_length(Some(TargetLength::Fixed(5)))
        .with_build_name_map(true);
    let output = ProfilePipeline::new(config)
        .run(&tracks, &CHROMS, genes)
        .unwrap();

    assert_eq!(output.stats.len(), 2);
    for track in &output.tracks {
        let matrix = track.as_matrix().unwrap();
        assert_eq!(matrix.data().dim(), (genes.len(), 5));
    }
    let gene_b = output.tracks[0]
        .as_matrix()
        .unwrap()
        .row_by_name("geneB")
        .unwrap()
        .to_vec();
    assert_eq!(gene_b[0], 2.0);
    assert_eq!(gene_b[4], 0.0);
}

#[rstest]
fn longest_fragment_target(
    tracks: Vec<BedGraphSource>,
    genes: &Vec<IntervalRecord>,
) {
    let config = ProfileConfig::default().with_target_length(Some(TargetLength::LongestFragment));
    let output = ProfilePipeline::new(config)
        .run(&tracks, &CHROMS, genes)
        .unwrap();
    let matrix = output.tracks[0].as_matrix().unwrap();
    assert_eq!(matrix.ncols(), 10);
    assert_eq!(
        matrix.row(2).unwrap().to_vec(),
        vec![4., 4., 4., 4., 4., 1., 1., 1., 1., 1.]
    );
}

#[rstest]
fn remapped_tracks_span_unit_range(
    tracks: Vec<BedGraphSource>,
    genes: &Vec<IntervalRecord>,
) {
    let config = ProfileConfig::default()
        .with_smoothing(Smoothing::Uniform(3))
        .with_smoothing_kind(SmoothingKind::Symmetric)
        .with_normalize(NormalizeMode::Remap);
    let conditioned = Assembled::new(&tracks, &CHROMS)
        .unwrap()
        .condition(&config.smoothing, config.smoothing_kind, config.normalize)
        .unwrap();
    for flat in conditioned.flats() {
        let min = flat.as_slice().iter().cloned().fold(f64::INFINITY, f64::min);
        let max = flat.as_slice().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_approx_eq!(min, 0.0);
        assert_approx_eq!(max, 1.0);
    }
    let extracted = conditioned.extract(genes, true).unwrap();
    assert!(extracted
        .fragments_by_name("geneC")
        .unwrap()
        .iter()
        .all(|f| f.iter().all(|v| (0.0..=1.0).contains(v))));
}

#[rstest]
fn centered_stats(tracks: Vec<BedGraphSource>, genes: &Vec<IntervalRecord>) {
    let config = ProfileConfig::default().with_normalize(NormalizeMode::Center);
    let output = ProfilePipeline::new(config)
        .run(&tracks, &CHROMS, genes)
        .unwrap();
    for stats in output.stats {
        assert_approx_eq!(stats.mean, 0.0, 1e-9);
        assert_approx_eq!(stats.std, 1.0, 1e-9);
    }
}

#[rstest]
fn dimer_filter_from_fasta(
    tracks: Vec<BedGraphSource>,
    genes: &Vec<IntervalRecord>,
) {
    let sequences = read_fasta_sequences(open_data("genome.fa")).unwrap();
    let output = ProfilePipeline::new(ProfileConfig::default())
        .with_dimer_filter(sequences)
        .run(&tracks, &CHROMS, genes)
        .unwrap();
    let set = output.tracks[0].as_fragments().unwrap();
    assert_eq!(set.get(0).unwrap(), &[0., 1., 1., 3., 3., 3.]);
}

#[rstest]
fn unknown_chromosome_in_order(tracks: Vec<BedGraphSource>, genes: &Vec<IntervalRecord>) {
    let result = ProfilePipeline::default().run(&tracks, &["chrI", "chrX"], genes);
    assert!(matches!(result, Err(ProfileError::UnknownChromosome(c)) if c == "chrX"));
}

#[rstest]
fn matrix_written_as_tsv(
    tracks: Vec<BedGraphSource>,
    genes: &Vec<IntervalRecord>,
) {
    let config = ProfileConfig::default()
        .with_target_length(Some(TargetLength::Fixed(4)))
        .with_build_name_map(true);
    let output = ProfilePipeline::new(config)
        .run(&tracks, &CHROMS, genes)
        .unwrap();

    let file = tempfile::NamedTempFile::new().unwrap();
    write_matrix_tsv(file.reopen().unwrap(), output.tracks[1].as_matrix().unwrap()).unwrap();
    let lines = BufReader::new(file.reopen().unwrap())
        .lines()
        .collect::<std::result::Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(lines.len(), genes.len() + 1);
    assert_eq!(lines[0], "name\t0\t1\t2\t3");
    assert_eq!(lines[3], "geneC\t0.5\t0.5\t0.5\t0.5");
}
