use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// The placement of one member of a [`crate::TagGroup`] on the sequence
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct MembershipDescriptor {
    /// The zero based index of the first residue
    #[serde(rename = "ZeroBasedStartIndex")]
    pub start_index: usize,
    /// The zero based index of the last residue (inclusive), equal to the start for a single residue
    #[serde(rename = "ZeroBasedEndIndex")]
    pub end_index: usize,
    /// The weight of this member in the group, `0.0` if none was given
    #[serde(rename = "Weight")]
    pub weight: OrderedFloat<f64>,
}

impl MembershipDescriptor {
    /// A member placed on a single residue
    pub const fn new(index: usize, weight: f64) -> Self {
        Self::ranged(index, index, weight)
    }

    /// A member placed on a range of residues
    pub const fn ranged(start_index: usize, end_index: usize, weight: f64) -> Self {
        Self {
            start_index,
            end_index,
            weight: OrderedFloat(weight),
        }
    }

    /// Check if this member covers more than one residue
    pub const fn is_range(&self) -> bool {
        self.start_index != self.end_index
    }

    /// Check if this member covers the given residue
    pub const fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index <= self.end_index
    }
}
