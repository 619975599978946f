use serde::{Deserialize, Serialize};
use thin_vec::ThinVec;

use crate::{
    model::Descriptor,
    write::json::{nullable, nullable_list},
};

/// A bracketed annotation placed on a single residue or a contiguous range of residues
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Tag {
    /// The zero based index of the first residue
    #[serde(rename = "ZeroBasedStartIndex")]
    pub start_index: usize,
    /// The zero based index of the last residue (inclusive)
    #[serde(rename = "ZeroBasedEndIndex")]
    pub end_index: usize,
    /// The descriptors in the order they were defined
    #[serde(
        rename = "Descriptors",
        serialize_with = "nullable",
        deserialize_with = "nullable_list"
    )]
    pub descriptors: ThinVec<Descriptor>,
}

impl Tag {
    /// A tag on a single residue
    pub fn new(index: usize, descriptors: impl IntoIterator<Item = Descriptor>) -> Self {
        Self::ranged(index, index, descriptors)
    }

    /// A tag on a range of residues, both ends inclusive
    pub fn ranged(
        start_index: usize,
        end_index: usize,
        descriptors: impl IntoIterator<Item = Descriptor>,
    ) -> Self {
        Self {
            start_index,
            end_index,
            descriptors: descriptors.into_iter().collect(),
        }
    }

    /// Check if this tag covers more than one residue
    pub const fn is_range(&self) -> bool {
        self.start_index != self.end_index
    }

    /// Check if this tag covers the given residue
    pub const fn contains(&self, index: usize) -> bool {
        self.start_index <= index && index <= self.end_index
    }
}

/// A modification that is known to be present but not localised to any position (`[mod]^2?SEQ`)
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct UnlocalizedTag {
    /// The number of times this modification occurs, at least one
    #[serde(rename = "Count")]
    pub count: u32,
    /// The descriptors in the order they were defined
    #[serde(
        rename = "Descriptors",
        serialize_with = "nullable",
        deserialize_with = "nullable_list"
    )]
    pub descriptors: ThinVec<Descriptor>,
}

impl UnlocalizedTag {
    /// Create a new modification of unknown position
    pub fn new(count: u32, descriptors: impl IntoIterator<Item = Descriptor>) -> Self {
        Self {
            count: count.max(1),
            descriptors: descriptors.into_iter().collect(),
        }
    }
}

/// A modification applied to the whole sequence, either an isotope label (no targets)
/// or a fixed modification on all residues with one of the target letters (`<[mod]@C,M>`).
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct GlobalModification {
    /// The descriptors in the order they were defined
    #[serde(
        rename = "Descriptors",
        serialize_with = "nullable",
        deserialize_with = "nullable_list"
    )]
    pub descriptors: ThinVec<Descriptor>,
    /// The residues this modification applies to, in the order they were first given
    #[serde(
        rename = "Targets",
        serialize_with = "nullable",
        deserialize_with = "nullable_list"
    )]
    pub targets: Vec<char>,
}

impl GlobalModification {
    /// A global isotope label
    pub fn isotope(descriptors: impl IntoIterator<Item = Descriptor>) -> Self {
        Self {
            descriptors: descriptors.into_iter().collect(),
            targets: Vec::new(),
        }
    }

    /// A fixed modification on the given residues, duplicate targets are ignored
    pub fn fixed(
        descriptors: impl IntoIterator<Item = Descriptor>,
        targets: impl IntoIterator<Item = char>,
    ) -> Self {
        let mut result = Self::isotope(descriptors);
        for target in targets {
            result.add_target(target);
        }
        result
    }

    /// Check if this is an isotope label
    pub fn is_isotope(&self) -> bool {
        self.targets.is_empty()
    }

    /// Add a target residue, returns false if it was already present
    pub fn add_target(&mut self, target: char) -> bool {
        if self.targets.contains(&target) {
            false
        } else {
            self.targets.push(target);
            true
        }
    }
}
