use std::io::Write;

use itertools::Itertools;

use crate::data_structs::typedef::SignalType;
use crate::data_structs::{
    FragmentSet,
    NameIndex,
    ResampledMatrix,
};
use crate::error::Result;

/// Row labels from a name lookup; rows without a name get `None`.
fn row_names(
    names: Option<&NameIndex>,
    n_rows: usize,
) -> Option<Vec<Option<&str>>> {
    let names = names?;
    let mut labels = vec![None; n_rows];
    for (name, &row) in names {
        if let Some(label) = labels.get_mut(row) {
            *label = Some(name.as_str());
        }
    }
    Some(labels)
}

fn write_rows<W, I>(
    writer: W,
    header: Option<Vec<String>>,
    rows: I,
    labels: Option<Vec<Option<&str>>>,
) -> Result<()>
where
    W: Write,
    I: Iterator<Item = Vec<SignalType>>, {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(writer);
    if let Some(header) = header {
        writer.write_record(header)?;
    }
    for (idx, row) in rows.enumerate() {
        let values = row.iter().map(|v| v.to_string());
        match &labels {
            Some(labels) => {
                let label = labels[idx].unwrap_or(".").to_string();
                writer.write_record(std::iter::once(label).chain(values))?;
            },
            None => writer.write_record(values)?,
        }
    }
    writer.flush()?;
    Ok(())
}

/// Writes a resampled matrix as TSV with a header of column indices. When
/// the matrix carries a name lookup the first column holds row names.
pub fn write_matrix_tsv<W: Write>(
    writer: W,
    matrix: &ResampledMatrix,
) -> Result<()> {
    let labels = row_names(matrix.names(), matrix.nrows());
    let header = labels
        .as_ref()
        .map(|_| "name".to_string())
        .into_iter()
        .chain((0..matrix.ncols()).map(|c| c.to_string()))
        .collect_vec();
    write_rows(
        writer,
        Some(header),
        matrix
            .data()
            .rows()
            .into_iter()
            .map(|row| row.to_vec()),
        labels,
    )
}

/// Writes raw fragments one per line; lines differ in length. Named sets
/// get a leading name column.
pub fn write_fragments_tsv<W: Write>(
    writer: W,
    set: &FragmentSet,
) -> Result<()> {
    let labels = row_names(set.names(), set.len());
    write_rows(writer, None, set.fragments().iter().cloned(), labels)
}
