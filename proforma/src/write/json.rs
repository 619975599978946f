//! The structured (JSON) form of a [`Term`].
//!
//! Empty collections are written as `null` and all field names follow the
//! ProForma JSON conventions (`Sequence`, `Tags`, `ZeroBasedStartIndex`, ...).

use context_error::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeStruct};

use crate::{ProFormaErrorKind, TagGroup, Term};

/// Serialise a list as `null` if it is empty
pub(crate) fn nullable<T: Serialize, S: Serializer>(
    list: &[T],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if list.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.collect_seq(list)
    }
}

/// Deserialise a list that could be `null`
pub(crate) fn nullable_list<'de, D, L, T>(deserializer: D) -> Result<L, D::Error>
where
    D: Deserializer<'de>,
    L: FromIterator<T>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .collect())
}

/// A borrowed list that serialises as `null` when empty
struct Nullable<'a, T>(&'a [T]);

impl<T: Serialize> Serialize for Nullable<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        nullable(self.0, serializer)
    }
}

impl Serialize for TagGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state =
            serializer.serialize_struct("TagGroup", if self.is_changing() { 8 } else { 5 })?;
        state.serialize_field("Name", self.name())?;
        state.serialize_field("Key", &self.key())?;
        state.serialize_field("EvidenceType", &self.evidence())?;
        state.serialize_field("Value", self.value())?;
        state.serialize_field("Members", &Nullable(self.members()))?;
        if self.is_changing() {
            state.serialize_field("KeyFlux", &self.key())?;
            state.serialize_field("EvidenceFlux", &self.evidence())?;
            state.serialize_field("ValueFlux", self.value())?;
        }
        state.end()
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let groups: Vec<&TagGroup> = self.tag_groups().values().collect();
        let mut state = serializer.serialize_struct("Term", 8)?;
        state.serialize_field("Sequence", self.sequence())?;
        state.serialize_field(
            "GlobalModifications",
            &Nullable(self.global_modifications()),
        )?;
        state.serialize_field(
            "NTerminalDescriptors",
            &Nullable(self.n_terminal_descriptors()),
        )?;
        state.serialize_field(
            "CTerminalDescriptors",
            &Nullable(self.c_terminal_descriptors()),
        )?;
        state.serialize_field("LabileDescriptors", &Nullable(self.labile_descriptors()))?;
        state.serialize_field("Tags", &Nullable(self.tags()))?;
        state.serialize_field("UnlocalizedTags", &Nullable(self.unlocalized_tags()))?;
        state.serialize_field("TagGroups", &Nullable(&groups))?;
        state.end()
    }
}

impl Term {
    /// The structured document for this term, with the fields in a fixed order.
    ///
    /// # Errors
    /// If the document could not be generated.
    pub fn to_json_value(&self) -> Result<serde_json::Value, BoxedError<'static, ProFormaErrorKind>> {
        serde_json::to_value(self).map_err(|err| {
            BoxedError::new(
                ProFormaErrorKind::Serialisation,
                "Could not generate JSON",
                err.to_string(),
                Context::full_line(0, self.sequence()).to_owned(),
            )
        })
    }

    /// The structured document for this term as a compact JSON string.
    ///
    /// # Errors
    /// If the document could not be generated.
    pub fn to_json(&self) -> Result<String, BoxedError<'static, ProFormaErrorKind>> {
        serde_json::to_string(self).map_err(|err| {
            BoxedError::new(
                ProFormaErrorKind::Serialisation,
                "Could not generate JSON",
                err.to_string(),
                Context::full_line(0, self.sequence()).to_owned(),
            )
        })
    }
}
