use crate::model::{Descriptor, EvidenceKind, KeyKind, MembershipDescriptor};

/// The value state of a [`TagGroup`].
///
/// A group found while parsing starts out as [`GroupValue::Pending`] and moves to
/// [`GroupValue::Fixed`] when the first occurrence with a value is read. This
/// transition can happen only once, see [`GroupValue::fix`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum GroupValue {
    /// No value seen yet, the key and evidence are the defaults from the first reference
    Pending {
        /// The key from the first reference to this group
        key: KeyKind,
        /// The evidence from the first reference to this group
        evidence: EvidenceKind,
    },
    /// The value is known
    Fixed(Descriptor),
}

impl Default for GroupValue {
    fn default() -> Self {
        Self::Pending {
            key: KeyKind::None,
            evidence: EvidenceKind::None,
        }
    }
}

impl GroupValue {
    /// Set the value of a pending group.
    /// # Errors
    /// If the value was already fixed, this gives back the unchanged value.
    pub fn fix(self, descriptor: Descriptor) -> Result<Self, Self> {
        match self {
            Self::Pending { .. } => Ok(Self::Fixed(descriptor)),
            fixed @ Self::Fixed(_) => Err(fixed),
        }
    }

    /// The key, for a pending group the default key
    pub const fn key(&self) -> KeyKind {
        match self {
            Self::Pending { key, .. } => *key,
            Self::Fixed(descriptor) => descriptor.key,
        }
    }

    /// The evidence, for a pending group the default evidence
    pub const fn evidence(&self) -> EvidenceKind {
        match self {
            Self::Pending { evidence, .. } => *evidence,
            Self::Fixed(descriptor) => descriptor.evidence,
        }
    }

    /// The value, empty for a pending group
    pub fn value(&self) -> &str {
        match self {
            Self::Pending { .. } => "",
            Self::Fixed(descriptor) => &descriptor.value,
        }
    }

    /// Get the descriptor if the value is known
    pub const fn descriptor(&self) -> Option<&Descriptor> {
        match self {
            Self::Pending { .. } => None,
            Self::Fixed(descriptor) => Some(descriptor),
        }
    }
}

/// A named annotation spread over multiple sites (`EMK[Phospho#g1]S[#g1]`)
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TagGroup {
    name: String,
    value: GroupValue,
    members: Vec<MembershipDescriptor>,
    changing: bool,
}

impl TagGroup {
    /// A group with a known value, as built by hand
    pub fn fixed(
        name: impl Into<String>,
        descriptor: Descriptor,
        members: impl IntoIterator<Item = MembershipDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            value: GroupValue::Fixed(descriptor),
            members: members.into_iter().collect(),
            changing: false,
        }
    }

    /// A group whose value is set later by whichever occurrence first defines it
    pub fn pending(name: impl Into<String>, key: KeyKind, evidence: EvidenceKind) -> Self {
        Self {
            name: name.into(),
            value: GroupValue::Pending { key, evidence },
            members: Vec::new(),
            changing: true,
        }
    }

    /// The name of the group
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value state of the group
    pub const fn group_value(&self) -> &GroupValue {
        &self.value
    }

    /// The key of the group
    pub const fn key(&self) -> KeyKind {
        self.value.key()
    }

    /// The evidence of the group
    pub const fn evidence(&self) -> EvidenceKind {
        self.value.evidence()
    }

    /// The value of the group, empty if it was never set
    pub fn value(&self) -> &str {
        self.value.value()
    }

    /// The members in the order they were found
    pub fn members(&self) -> &[MembershipDescriptor] {
        &self.members
    }

    /// If this group got its value while parsing instead of at creation
    pub const fn is_changing(&self) -> bool {
        self.changing
    }

    /// Add a member to this group
    pub fn add_member(&mut self, member: MembershipDescriptor) {
        self.members.push(member);
    }

    /// Set the value of this group.
    /// # Errors
    /// If the value was set before, the group is left unchanged and the rejected descriptor is returned.
    pub fn set_value(&mut self, descriptor: Descriptor) -> Result<(), Descriptor> {
        match std::mem::take(&mut self.value).fix(descriptor.clone()) {
            Ok(value) => {
                self.value = value;
                Ok(())
            }
            Err(value) => {
                self.value = value;
                Err(descriptor)
            }
        }
    }

    /// Remove all members that cover the given residue, returns the number of removed members
    pub fn remove_members_at(&mut self, index: usize) -> usize {
        let before = self.members.len();
        self.members.retain(|m| !m.contains(index));
        before - self.members.len()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn value_is_fixed_once() {
        let mut group = TagGroup::pending("g1", KeyKind::None, EvidenceKind::None);
        assert!(group.is_changing());
        assert_eq!(group.value(), "");
        assert_eq!(group.set_value(Descriptor::name("Phospho")), Ok(()));
        assert_eq!(group.value(), "Phospho");
        assert_eq!(group.key(), KeyKind::Name);
        assert_eq!(
            group.set_value(Descriptor::name("Oxidation")),
            Err(Descriptor::name("Oxidation"))
        );
        assert_eq!(group.value(), "Phospho");
    }

    #[test]
    fn fix_is_consuming() {
        let pending = GroupValue::default();
        let fixed = pending.fix(Descriptor::mass("+1")).unwrap();
        assert_eq!(fixed.value(), "+1");
        assert_eq!(fixed.clone().fix(Descriptor::mass("+2")), Err(fixed));
    }

    #[test]
    fn remove_members() {
        let mut group = TagGroup::fixed(
            "g1",
            Descriptor::name("Phospho"),
            [
                MembershipDescriptor::new(1, 0.0),
                MembershipDescriptor::ranged(2, 4, 0.0),
                MembershipDescriptor::new(6, 0.5),
            ],
        );
        assert!(!group.is_changing());
        assert_eq!(group.remove_members_at(3), 1);
        assert_eq!(
            group.members(),
            &[
                MembershipDescriptor::new(1, 0.0),
                MembershipDescriptor::new(6, 0.5)
            ]
        );
    }
}
