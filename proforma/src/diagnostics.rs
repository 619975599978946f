//! Optional trace output for the parser and writer.
//!
//! Nothing is global: a sink is handed to the entry points that accept one
//! ([`crate::Term::pro_forma_with`], [`crate::Term::to_pro_forma_with`]) and
//! when no sink is given all trace points are skipped.

use std::fmt;

/// Receives the trace messages generated while parsing or writing.
///
/// Any `Fn(fmt::Arguments)` closure is a sink, and [`LogSink`] forwards to the
/// [`log`] facade.
pub trait DiagnosticSink: Send + Sync {
    /// Handle a single trace message
    fn trace(&self, message: fmt::Arguments<'_>);
}

impl<F> DiagnosticSink for F
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync,
{
    fn trace(&self, message: fmt::Arguments<'_>) {
        self(message);
    }
}

/// Forwards all messages to [`log::trace!`] with target `proforma`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn trace(&self, message: fmt::Arguments<'_>) {
        log::trace!(target: "proforma", "{message}");
    }
}

/// The sink as threaded through the parser and writer
#[derive(Clone, Copy, Default)]
pub(crate) struct Diagnostics<'s>(Option<&'s dyn DiagnosticSink>);

impl<'s> Diagnostics<'s> {
    pub(crate) fn new(sink: Option<&'s dyn DiagnosticSink>) -> Self {
        Self(sink)
    }

    pub(crate) fn trace(&self, message: fmt::Arguments<'_>) {
        if let Some(sink) = self.0 {
            sink.trace(message);
        }
    }
}

/// Send a formatted message to a [`Diagnostics`], the arguments are only formatted if a sink is present.
macro_rules! diagnostic {
    ($sink:expr, $($arg:tt)+) => {
        $sink.trace(format_args!($($arg)+))
    };
}
