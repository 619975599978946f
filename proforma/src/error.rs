//! The [`ProFormaErrorKind`] which makes it easy for downstream users of the error type to match on the exact error.

use context_error::ErrorKind;

/// All the ways reading or writing a ProForma definition can go wrong.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ProFormaErrorKind {
    /// The input string was empty
    #[default]
    EmptyInput,
    /// A square bracket was opened but never closed, or closed without being opened
    UnbalancedBrackets,
    /// A curly brace was opened but never closed, or closed without being opened
    UnbalancedBraces,
    /// A global modification (`<...>`) was never closed
    UnclosedGlobalModification,
    /// A range was opened while another range was still open
    OverlappingRange,
    /// A range was closed but the next character was not a tag
    RangeNotFollowedByTag,
    /// A range was closed without being opened
    UnopenedRange,
    /// A range was still open at the end of the definition
    UnclosedRange,
    /// A range does not contain any residues
    EmptyRange,
    /// Two tags were placed directly next to each other
    AdjacentTagsNotAllowed,
    /// A global modification was placed after other content
    MisplacedGlobalModification,
    /// A global modification is not formatted as `<[mod]@targets>` or `<isotope>`
    InvalidGlobalModification,
    /// The target list of a global modification contained something other than residue letters
    InvalidGlobalTarget,
    /// A second C terminal marker (`-`) was found
    DuplicateCTerminalMarker,
    /// The C terminal marker (`-`) was not followed by a tag
    DanglingCTerminalMarker,
    /// A residue was found after the C terminal marker
    ResidueAfterCTerminal,
    /// A tag was placed before any residue without being an N terminal or unlocalised modification
    MissingNTerminalContext,
    /// A modification of unknown position was placed after the N terminal modification
    UnlocalizedAfterNTerminal,
    /// The multiplicity (`^N`) of a modification of unknown position could not be read
    MalformedMultiplicity,
    /// A character in the sequence was not an upper case residue letter
    InvalidResidueCharacter,
    /// A descriptor was empty
    EmptyDescriptor,
    /// The weight of a group member could not be read
    MalformedWeight,
    /// A group reference (`#`) did not have a name
    EmptyGroupName,
    /// The value of a group was defined more than once
    GroupValueAlreadySet,
    /// A descriptor used an unknown controlled vocabulary prefix (strict mode)
    UnknownVocabulary,
    /// A descriptor with an unknown prefix was read as a free text name (lenient mode, a warning)
    FreeTextPrefix,
    /// A descriptor has a key and evidence combination that has no ProForma text form
    UnwritableDescriptor,
    /// An annotation refers to a position outside of the sequence
    AnnotationOutOfBounds,
    /// The structured document could not be generated
    Serialisation,
}

impl ErrorKind for ProFormaErrorKind {
    type Settings = ();
    fn descriptor(&self) -> &'static str {
        if self.is_error(()) { "error" } else { "warning" }
    }
    fn ignored(&self, _settings: Self::Settings) -> bool {
        false
    }
    fn is_error(&self, _settings: Self::Settings) -> bool {
        !matches!(self, Self::FreeTextPrefix)
    }
}
