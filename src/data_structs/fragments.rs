use indexmap::IndexMap;
use ndarray::{
    Array2,
    ArrayView1,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::{
    Fragment,
    SignalType,
};

/// Name → row lookup shared by fragment sets and resampled matrices.
pub type NameIndex = IndexMap<String, usize>;

/// Fragments extracted from one track, in interval order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentSet {
    fragments: Vec<Fragment>,
    names:     Option<NameIndex>,
}

impl FragmentSet {
    pub fn new(
        fragments: Vec<Fragment>,
        names: Option<NameIndex>,
    ) -> Self {
        Self { fragments, names }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }

    /// Name lookup, present only when requested and every interval was
    /// named.
    pub fn names(&self) -> Option<&NameIndex> {
        self.names.as_ref()
    }

    pub fn get(
        &self,
        idx: usize,
    ) -> Option<&[SignalType]> {
        self.fragments.get(idx).map(Vec::as_slice)
    }

    pub fn get_by_name(
        &self,
        name: &str,
    ) -> Option<&[SignalType]> {
        let idx = *self.names.as_ref()?.get(name)?;
        self.get(idx)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<Fragment>, Option<NameIndex>) {
        (self.fragments, self.names)
    }
}

/// Fixed-width profiles: row `i` is fragment `i` resampled to `ncols()`
/// points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledMatrix {
    data:  Array2<SignalType>,
    names: Option<NameIndex>,
}

impl ResampledMatrix {
    pub fn new(
        data: Array2<SignalType>,
        names: Option<NameIndex>,
    ) -> Self {
        Self { data, names }
    }

    pub fn data(&self) -> &Array2<SignalType> {
        &self.data
    }

    pub fn into_inner(self) -> Array2<SignalType> {
        self.data
    }

    pub fn names(&self) -> Option<&NameIndex> {
        self.names.as_ref()
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn row(
        &self,
        idx: usize,
    ) -> Option<ArrayView1<'_, SignalType>> {
        (idx < self.nrows()).then(|| self.data.row(idx))
    }

    pub fn row_by_name(
        &self,
        name: &str,
    ) -> Option<ArrayView1<'_, SignalType>> {
        let idx = *self.names.as_ref()?.get(name)?;
        self.row(idx)
    }

    /// Column-wise mean across all rows: the average profile of the track.
    pub fn mean_profile(&self) -> Option<Vec<SignalType>> {
        self.data
            .mean_axis(ndarray::Axis(0))
            .map(|profile| profile.to_vec())
    }
}
