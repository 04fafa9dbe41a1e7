use std::io::{
    BufReader,
    Read,
};

use indexmap::IndexMap;
use log::debug;

use crate::data_structs::typedef::PosType;
use crate::error::{
    ProfileError,
    Result,
};
use crate::io::ChromLengths;

/// Reads a two-column `chrom<TAB>length` table, as written by
/// `fetchChromSizes` and similar tools. Order is kept; `#` lines are
/// skipped.
pub fn read_chrom_sizes<R: Read>(reader: R) -> Result<ChromLengths> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut lengths = ChromLengths::new();
    for record in reader.records() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or_default();
        let (chrom, length) = match (record.get(0), record.get(1)) {
            (Some(chrom), Some(length)) => (chrom, length),
            _ => {
                return Err(ProfileError::parse(format!(
                    "line {line}: expected chromosome and length"
                )))
            },
        };
        let length = length.trim().parse::<PosType>().map_err(|e| {
            ProfileError::parse(format!("line {line}: bad length '{length}': {e}"))
        })?;
        if lengths
            .insert(chrom.to_string(), length)
            .is_some()
        {
            return Err(ProfileError::invalid_parameter(format!(
                "chromosome {chrom} is listed twice"
            )));
        }
    }
    debug!("Read lengths of {} chromosomes", lengths.len());
    Ok(lengths)
}

/// Chromosome lengths from a FASTA index (`.fai`), in index order.
pub fn read_fai_lengths<R: Read>(reader: R) -> Result<ChromLengths> {
    let records: Vec<noodles::fasta::fai::Record> =
        noodles::fasta::fai::io::Reader::new(BufReader::new(reader))
            .read_index()?
            .into();
    Ok(records
        .into_iter()
        .map(|r| {
            (
                String::from_utf8_lossy(r.name()).to_string(),
                r.length() as PosType,
            )
        })
        .collect())
}

/// Reads every sequence of a FASTA file, keyed by record id.
pub fn read_fasta_sequences<R: Read>(reader: R) -> Result<IndexMap<String, Vec<u8>>> {
    let mut sequences = IndexMap::new();
    for record in bio::io::fasta::Reader::new(reader).records() {
        let record = record?;
        sequences.insert(record.id().to_string(), record.seq().to_vec());
    }
    debug!("Read {} sequences", sequences.len());
    Ok(sequences)
}
