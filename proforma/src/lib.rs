#![doc = include_str!("../README.md")]

#[macro_use]
pub mod diagnostics;
mod error;
mod helper_functions;
/// The term model: descriptors, tags, tag groups and the aggregate [`Term`].
pub mod model;
/// The single pass ProForma parser and its descriptor resolver.
pub mod parse;
/// Writing terms back to canonical ProForma and to the structured JSON document.
pub mod write;

#[cfg(test)]
mod tests;

pub use diagnostics::{DiagnosticSink, LogSink};
pub use error::ProFormaErrorKind;
pub use model::*;
pub use parse::ParserSettings;

/// A subset of the types and traits that are envisioned to be used the most, importing this is a good starting point for working with the crate
pub mod prelude {
    pub use crate::ProFormaErrorKind;
    pub use crate::diagnostics::{DiagnosticSink, LogSink};
    pub use crate::model::{
        Descriptor, EvidenceKind, GlobalModification, GroupValue, KeyKind, MembershipDescriptor,
        Tag, TagGroup, Term, UnlocalizedTag,
    };
    pub use crate::parse::ParserSettings;
}

/// The result of a parser, contains the result and a list of warnings if it succeeded and only a list of errors if it failed.
pub type ParserResult<'a, T, Kind> =
    Result<(T, Vec<context_error::BoxedError<'a, Kind>>), Vec<context_error::BoxedError<'a, Kind>>>;
