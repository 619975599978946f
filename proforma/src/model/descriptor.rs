use serde::{Deserialize, Serialize};

/// What the value of a [`Descriptor`] represents
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum KeyKind {
    /// No key, only seen on groups that were referenced without ever being given a value
    #[default]
    None,
    /// A modification name, or any free text that is not recognised as anything else
    Name,
    /// An accession in a controlled vocabulary, e.g. `UNIMOD:35`
    Identifier,
    /// A mass shift, e.g. `+15.995`
    Mass,
    /// A chemical formula, e.g. `Formula:C2H3NO`
    Formula,
    /// A glycan composition, e.g. `Glycan:Hex`
    Glycan,
    /// Free text information, e.g. `Info:found by manual inspection`
    Info,
}

/// The source of the evidence for a [`Descriptor`]
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum EvidenceKind {
    /// No evidence given
    #[default]
    None,
    /// Observed (`Obs:`)
    Observed,
    /// Unimod (`U:` or `UNIMOD:`)
    Unimod,
    /// UniProt
    UniProt,
    /// RESID (`R:` or `RESID:`)
    Resid,
    /// PSI-MOD (`M:` or `MOD:`)
    PsiMod,
    /// XL-MOD (`X:` or `XLMOD:`)
    XlMod,
    /// GNOme (`G:` or `GNO:`)
    Gno,
    /// BRNO (`B:`)
    Brno,
}

/// A single annotation inside a tag, tags can hold multiple descriptors separated by `|`.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Descriptor {
    /// The kind of value
    #[serde(rename = "Key")]
    pub key: KeyKind,
    /// Where the value comes from
    #[serde(rename = "EvidenceType")]
    pub evidence: EvidenceKind,
    /// The value as text, for identifiers this keeps the accession prefix (`MOD:00719`) except for RESID
    #[serde(rename = "Value")]
    pub value: String,
}

impl Descriptor {
    /// Create a new descriptor
    pub fn new(key: KeyKind, evidence: EvidenceKind, value: impl Into<String>) -> Self {
        Self {
            key,
            evidence,
            value: value.into(),
        }
    }

    /// Create a keyless descriptor, this is stored as a [`KeyKind::Name`] without evidence
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(KeyKind::Name, EvidenceKind::None, value)
    }

    /// Create a mass shift descriptor without evidence
    pub fn mass(value: impl Into<String>) -> Self {
        Self::new(KeyKind::Mass, EvidenceKind::None, value)
    }
}

impl std::fmt::Display for Descriptor {
    /// Debug style display `key:evidence:value`, use the writer for ProForma text
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}:{:?}:{}", self.key, self.evidence, self.value)
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(
            Descriptor::name("Phospho"),
            Descriptor::new(KeyKind::Name, EvidenceKind::None, "Phospho")
        );
        assert_eq!(Descriptor::mass("+15.99").key, KeyKind::Mass);
        assert_eq!(
            Descriptor::new(KeyKind::Identifier, EvidenceKind::Unimod, "UNIMOD:35").to_string(),
            "Identifier:Unimod:UNIMOD:35"
        );
    }
}
