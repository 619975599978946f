mod resolve;
mod scanner;

use context_error::Context;
use serde::{Deserialize, Serialize};

use crate::{DiagnosticSink, ParserResult, ProFormaErrorKind, Term, diagnostics::Diagnostics};

/// The settings for the ProForma parser
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ParserSettings {
    /// Reject descriptors with a prefix that is not a known controlled vocabulary or key
    /// (`XYZ:12345`). When not set these are read as free text names and a
    /// [`ProFormaErrorKind::FreeTextPrefix`] warning is given.
    pub strict: bool,
}

impl ParserSettings {
    /// The strict settings
    pub const fn strict() -> Self {
        Self { strict: true }
    }
}

impl Term {
    /// Parse a [ProForma](https://github.com/HUPO-PSI/ProForma) definition. Unknown
    /// prefixes are accepted as free text with a warning.
    ///
    /// # Errors
    /// It fails when the string is not a valid ProForma string.
    pub fn pro_forma(value: &str) -> ParserResult<'_, Self, ProFormaErrorKind> {
        Self::pro_forma_with(value, &ParserSettings::default(), None)
    }

    /// Parse a [ProForma](https://github.com/HUPO-PSI/ProForma) definition and
    /// reject any descriptor with an unknown prefix.
    ///
    /// # Errors
    /// It fails when the string is not a valid ProForma string.
    pub fn pro_forma_strict(value: &str) -> ParserResult<'_, Self, ProFormaErrorKind> {
        Self::pro_forma_with(value, &ParserSettings::strict(), None)
    }

    /// Parse a [ProForma](https://github.com/HUPO-PSI/ProForma) definition with the
    /// given settings, sending trace messages to the sink if one is given.
    ///
    /// # Errors
    /// It fails when the string is not a valid ProForma string. The scan stops at
    /// the first error, the returned list then holds any warnings found up to that
    /// point followed by the error.
    pub fn pro_forma_with<'a>(
        value: &'a str,
        settings: &ParserSettings,
        sink: Option<&dyn DiagnosticSink>,
    ) -> ParserResult<'a, Self, ProFormaErrorKind> {
        scanner::Scanner::new(
            Context::none().lines(0, value),
            value,
            *settings,
            Diagnostics::new(sink),
        )
        .run()
    }
}
