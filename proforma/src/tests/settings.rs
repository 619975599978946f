use std::{fmt, sync::Mutex};
use context_error::FullErrorContent as _;

use crate::*;

#[test]
fn unknown_prefix_lenient() {
    let (term, warnings) = Term::pro_forma("A[XYZ:12345]CDEFGHIK").unwrap();
    assert_eq!(
        term.tags()[0].descriptors.as_slice(),
        &[Descriptor::new(KeyKind::Name, EvidenceKind::None, "XYZ:12345")]
    );
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].get_kind().clone(),
        ProFormaErrorKind::FreeTextPrefix
    );
}

#[test]
fn unknown_prefix_strict() {
    let errors = Term::pro_forma_strict("A[XYZ:12345]CDEFGHIK").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].get_kind().clone(),
        ProFormaErrorKind::UnknownVocabulary
    );
    // Short forms are always known, even if the accession is not valid
    assert!(Term::pro_forma_strict("A[M:00719]CDEFGHIK").is_ok());
}

#[test]
fn settings_serialise() {
    let settings = ParserSettings::strict();
    let text = serde_json::to_string(&settings).unwrap();
    assert_eq!(text, r#"{"strict":true}"#);
    assert_eq!(
        serde_json::from_str::<ParserSettings>(&text).unwrap(),
        settings
    );
    assert!(!ParserSettings::default().strict);
}

#[test]
fn sink_receives_messages() {
    let messages = Mutex::new(Vec::new());
    let sink = |message: fmt::Arguments<'_>| messages.lock().unwrap().push(message.to_string());
    let (term, _) = Term::pro_forma_with(
        "EM[Oxidation]EVT[#g1]S[Phospho#g1]PEK",
        &ParserSettings::default(),
        Some(&sink),
    )
    .unwrap();
    term.to_pro_forma_with(Some(&sink)).unwrap();
    let messages = messages.into_inner().unwrap();
    assert!(messages.iter().any(|m| m.contains("new tag group 'g1'")));
    assert!(messages.iter().any(|m| m.contains("value of group 'g1' set")));
    assert!(messages.iter().any(|m| m.starts_with("sorted annotations")));
}

#[test]
fn log_sink() {
    assert!(Term::pro_forma_with("A[Phospho]C", &ParserSettings::default(), Some(&LogSink)).is_ok());
}
