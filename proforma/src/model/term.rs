use indexmap::IndexMap;
use thin_vec::ThinVec;

use crate::model::{Descriptor, GlobalModification, Tag, TagGroup, UnlocalizedTag};

/// A full ProForma definition: the sequence and all annotations.
///
/// A term is built by the parser ([`Term::pro_forma`]) or by hand with the
/// builder methods, and written back with [`Term::to_pro_forma`] or
/// [`Term::to_json`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Term {
    sequence: String,
    tags: Vec<Tag>,
    n_terminal: ThinVec<Descriptor>,
    c_terminal: ThinVec<Descriptor>,
    labile: ThinVec<Descriptor>,
    unlocalized: Vec<UnlocalizedTag>,
    tag_groups: IndexMap<String, TagGroup>,
    global_modifications: Vec<GlobalModification>,
}

impl Term {
    /// Create a term with the given sequence and no annotations
    pub fn new(sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
            ..Self::default()
        }
    }

    #[expect(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        sequence: String,
        tags: Vec<Tag>,
        n_terminal: ThinVec<Descriptor>,
        c_terminal: ThinVec<Descriptor>,
        labile: ThinVec<Descriptor>,
        unlocalized: Vec<UnlocalizedTag>,
        tag_groups: IndexMap<String, TagGroup>,
        global_modifications: Vec<GlobalModification>,
    ) -> Self {
        Self {
            sequence,
            tags,
            n_terminal,
            c_terminal,
            labile,
            unlocalized,
            tag_groups,
            global_modifications,
        }
    }

    /// The sequence as upper case residue letters
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// The number of residues
    pub fn len(&self) -> usize {
        self.sequence.chars().count()
    }

    /// Check if there are no residues
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// All placed tags, in the order they were defined
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// The tags that cover the given residue
    pub fn tags_at(&self, index: usize) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(move |t| t.contains(index))
    }

    /// The N terminal descriptors
    pub fn n_terminal_descriptors(&self) -> &[Descriptor] {
        &self.n_terminal
    }

    /// The C terminal descriptors
    pub fn c_terminal_descriptors(&self) -> &[Descriptor] {
        &self.c_terminal
    }

    /// The labile descriptors
    pub fn labile_descriptors(&self) -> &[Descriptor] {
        &self.labile
    }

    /// The modifications of unknown position
    pub fn unlocalized_tags(&self) -> &[UnlocalizedTag] {
        &self.unlocalized
    }

    /// All tag groups, in the order they were first referenced
    pub const fn tag_groups(&self) -> &IndexMap<String, TagGroup> {
        &self.tag_groups
    }

    /// Get a tag group by name
    pub fn tag_group(&self, name: &str) -> Option<&TagGroup> {
        self.tag_groups.get(name)
    }

    /// The global modifications
    pub fn global_modifications(&self) -> &[GlobalModification] {
        &self.global_modifications
    }

    /// Add a tag
    #[must_use]
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Add an N terminal descriptor
    #[must_use]
    pub fn n_terminal(mut self, descriptor: Descriptor) -> Self {
        self.n_terminal.push(descriptor);
        self
    }

    /// Add a C terminal descriptor
    #[must_use]
    pub fn c_terminal(mut self, descriptor: Descriptor) -> Self {
        self.c_terminal.push(descriptor);
        self
    }

    /// Add a labile descriptor
    #[must_use]
    pub fn labile(mut self, descriptor: Descriptor) -> Self {
        self.labile.push(descriptor);
        self
    }

    /// Add a modification of unknown position
    #[must_use]
    pub fn unlocalized(mut self, tag: UnlocalizedTag) -> Self {
        self.unlocalized.push(tag);
        self
    }

    /// Add a tag group, replacing any group with the same name
    #[must_use]
    pub fn tag_group_with(mut self, group: TagGroup) -> Self {
        self.tag_groups.insert(group.name().to_string(), group);
        self
    }

    /// Add a global modification
    #[must_use]
    pub fn global_modification(mut self, modification: GlobalModification) -> Self {
        self.global_modifications.push(modification);
        self
    }

    /// Remove every tag and every tag group member that covers the given residue.
    /// The sequence and all other annotations are left as is. Returns the number
    /// of removed annotations.
    pub fn remove_modifications_at(&mut self, index: usize) -> usize {
        let before = self.tags.len();
        self.tags.retain(|t| !t.contains(index));
        let mut removed = before - self.tags.len();
        for group in self.tag_groups.values_mut() {
            removed += group.remove_members_at(index);
        }
        removed
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::model::MembershipDescriptor;

    #[test]
    fn remove_modifications() {
        let mut term = Term::new("ACDEFGHIK")
            .tag(Tag::new(1, [Descriptor::name("Phospho")]))
            .tag(Tag::ranged(3, 5, [Descriptor::mass("+1")]))
            .tag_group_with(TagGroup::fixed(
                "g1",
                Descriptor::name("Oxidation"),
                [
                    MembershipDescriptor::new(1, 0.0),
                    MembershipDescriptor::new(7, 0.0),
                ],
            ));
        assert_eq!(term.tags_at(4).count(), 1);
        assert_eq!(term.remove_modifications_at(1), 2);
        assert_eq!(term.sequence(), "ACDEFGHIK");
        assert_eq!(term.tags().len(), 1);
        assert_eq!(term.tag_group("g1").unwrap().members().len(), 1);
        assert_eq!(term.remove_modifications_at(0), 0);
    }
}
