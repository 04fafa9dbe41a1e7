//! Concatenation of per-chromosome tracks into one flat genome-wide signal.

use log::{
    debug,
    info,
};

use crate::data_structs::{
    ChromOffsetTable,
    FlatSignal,
};
use crate::error::{
    ProfileError,
    Result,
};
use crate::io::{
    ChromLengths,
    SignalSource,
};

/// Reads every chromosome of `source` in `chrom_order` and concatenates the
/// values into one [`FlatSignal`], recording where each chromosome starts.
///
/// The order is always the caller's; the source's own chromosome order is
/// never consulted. Chromosomes the source knows about but that are missing
/// from `chrom_order` are skipped.
pub fn assemble<S, C>(
    source: &S,
    chrom_order: &[C],
) -> Result<(FlatSignal, ChromOffsetTable)>
where
    S: SignalSource + ?Sized,
    C: AsRef<str>, {
    let lengths = source.chrom_lengths();
    let table = offset_table(&lengths, chrom_order)?;
    let flat = read_flat(source, &table)?;
    info!(
        "Assembled {} chromosomes into a flat signal of {} values",
        table.len(),
        flat.len()
    );
    Ok((flat, table))
}

/// Assembles several tracks over the same chromosome order.
///
/// The offset table is built from the first source and reused for the
/// rest; every other source must report the same length for each ordered
/// chromosome, otherwise [`ProfileError::ChromosomeLengthMismatch`].
pub fn assemble_all<S, C>(
    sources: &[S],
    chrom_order: &[C],
) -> Result<(Vec<FlatSignal>, ChromOffsetTable)>
where
    S: SignalSource,
    C: AsRef<str>, {
    let (first, rest) = sources.split_first().ok_or_else(|| {
        ProfileError::EmptySource("no signal sources supplied".into())
    })?;
    let (first_flat, table) = assemble(first, chrom_order)?;

    let mut flats = Vec::with_capacity(sources.len());
    flats.push(first_flat);
    for (idx, source) in rest.iter().enumerate() {
        check_lengths(&source.chrom_lengths(), &table)?;
        debug!("Reading track {} of {}", idx + 2, sources.len());
        flats.push(read_flat(source, &table)?);
    }
    Ok((flats, table))
}

fn offset_table<C: AsRef<str>>(
    lengths: &ChromLengths,
    chrom_order: &[C],
) -> Result<ChromOffsetTable> {
    if chrom_order.is_empty() {
        return Err(ProfileError::EmptySource(
            "chromosome order is empty".into(),
        ));
    }
    if lengths.is_empty() {
        return Err(ProfileError::EmptySource(
            "signal source reports no chromosomes".into(),
        ));
    }

    let mut table = ChromOffsetTable::new();
    for chrom in chrom_order.iter().map(AsRef::as_ref) {
        let length = *lengths
            .get(chrom)
            .ok_or_else(|| ProfileError::UnknownChromosome(chrom.to_string()))?;
        table.push(chrom, length)?;
    }
    Ok(table)
}

fn check_lengths(
    lengths: &ChromLengths,
    table: &ChromOffsetTable,
) -> Result<()> {
    for (chrom, span) in table.iter() {
        let found = *lengths
            .get(chrom)
            .ok_or_else(|| ProfileError::UnknownChromosome(chrom.to_string()))?;
        if found != span.length {
            return Err(ProfileError::ChromosomeLengthMismatch {
                chrom: chrom.to_string(),
                expected: span.length,
                found,
            });
        }
    }
    Ok(())
}

fn read_flat<S: SignalSource + ?Sized>(
    source: &S,
    table: &ChromOffsetTable,
) -> Result<FlatSignal> {
    let mut flat = FlatSignal::with_capacity(table.total_length());
    for (chrom, span) in table.iter() {
        let values = source.values_in_range(chrom, 0, span.length)?;
        if values.len() != span.length {
            return Err(ProfileError::ChromosomeLengthMismatch {
                chrom:    chrom.to_string(),
                expected: span.length,
                found:    values.len(),
            });
        }
        flat.extend_sanitized(values);
    }
    Ok(flat)
}
