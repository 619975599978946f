//! Resolve the text of a single descriptor (one `|` separated part of a tag) into its parts.

use context_error::*;

use crate::{Descriptor, EvidenceKind, KeyKind, ProFormaErrorKind};

/// A resolved descriptor: the descriptor itself (`None` for a bare group
/// reference like `#g1`), the group it belongs to, and its weight in that group.
#[derive(Debug)]
pub(super) struct Resolved<'a> {
    pub(super) descriptor: Option<Descriptor>,
    pub(super) group: Option<&'a str>,
    pub(super) weight: f64,
    pub(super) warning: Option<BoxedError<'a, ProFormaErrorKind>>,
}

/// Resolve the text of a single descriptor. The text should already be stripped
/// of leading spaces, `offset` is the byte offset of the text in the full line
/// and is only used to generate the error context.
/// # Errors
/// If the descriptor is empty, if the group weight is not a valid number, if the
/// group name is empty, or, in strict mode, if the prefix is not recognised.
pub(super) fn resolve_descriptor<'a>(
    base_context: &Context<'a>,
    text: &'a str,
    offset: usize,
    strict: bool,
) -> Result<Resolved<'a>, BoxedError<'a, ProFormaErrorKind>> {
    if text.is_empty() {
        return Err(BoxedError::new(
            ProFormaErrorKind::EmptyDescriptor,
            "Empty descriptor",
            "A descriptor cannot be empty, remove the empty tag or the superfluous '|'",
            base_context
                .clone()
                .add_highlight(Highlight::from((0, offset.saturating_sub(1), 1))),
        ));
    }

    let (body, group, weight) = if let Some(hash) = text.find('#') {
        let suffix = &text[hash + 1..];
        let (name, weight) = if let Some(open) = suffix.find('(') {
            let Some(weight_text) = suffix[open + 1..].strip_suffix(')') else {
                return Err(BoxedError::new(
                    ProFormaErrorKind::MalformedWeight,
                    "Invalid group weight",
                    "A group weight should be enclosed in parentheses at the very end of the descriptor, like '#g1(0.5)'",
                    base_context
                        .clone()
                        .add_highlight(Highlight::from((0, offset + hash + 1 + open, suffix.len() - open))),
                ));
            };
            let weight = weight_text.parse::<f64>().map_err(|err| {
                BoxedError::new(
                    ProFormaErrorKind::MalformedWeight,
                    "Invalid group weight",
                    format!("The group weight could not be read as a number: {err}"),
                    base_context.clone().add_highlight(Highlight::from((
                        0,
                        offset + hash + open + 2,
                        weight_text.len().max(1),
                    ))),
                )
            })?;
            if !weight.is_finite() {
                return Err(BoxedError::new(
                    ProFormaErrorKind::MalformedWeight,
                    "Invalid group weight",
                    "The group weight has to be a finite number",
                    base_context.clone().add_highlight(Highlight::from((
                        0,
                        offset + hash + open + 2,
                        weight_text.len(),
                    ))),
                ));
            }
            (&suffix[..open], weight)
        } else {
            (suffix, 0.0)
        };
        if name.is_empty() {
            return Err(BoxedError::new(
                ProFormaErrorKind::EmptyGroupName,
                "Empty group name",
                "A group reference ('#') needs a name, like '#g1'",
                base_context.clone().add_highlight(Highlight::from((0, offset + hash, 1))),
            ));
        }
        (&text[..hash], Some(name), weight)
    } else {
        (text, None, 0.0)
    };

    // A bare group reference only adds a member to the group
    if body.is_empty() {
        return Ok(Resolved {
            descriptor: None,
            group,
            weight,
            warning: None,
        });
    }

    let mut warning = None;
    let descriptor = if let Some((head, tail)) = body.split_once(':') {
        let mass_or_name = if tail.starts_with(['+', '-']) {
            KeyKind::Mass
        } else {
            KeyKind::Name
        };
        match head.trim().to_ascii_lowercase().as_str() {
            "formula" => Descriptor::new(KeyKind::Formula, EvidenceKind::None, tail),
            "glycan" => Descriptor::new(KeyKind::Glycan, EvidenceKind::None, tail),
            "info" => Descriptor::new(KeyKind::Info, EvidenceKind::None, tail),
            "mod" => Descriptor::new(KeyKind::Identifier, EvidenceKind::PsiMod, body),
            "unimod" => Descriptor::new(
                KeyKind::Identifier,
                EvidenceKind::Unimod,
                body.to_ascii_uppercase(),
            ),
            "xlmod" => Descriptor::new(KeyKind::Identifier, EvidenceKind::XlMod, body),
            "gno" => Descriptor::new(KeyKind::Identifier, EvidenceKind::Gno, body),
            "resid" => Descriptor::new(KeyKind::Identifier, EvidenceKind::Resid, tail),
            "u" => Descriptor::new(mass_or_name, EvidenceKind::Unimod, tail),
            "m" => Descriptor::new(mass_or_name, EvidenceKind::PsiMod, tail),
            "r" => Descriptor::new(mass_or_name, EvidenceKind::Resid, tail),
            "x" => Descriptor::new(mass_or_name, EvidenceKind::XlMod, tail),
            "g" => Descriptor::new(mass_or_name, EvidenceKind::Gno, tail),
            "b" => Descriptor::new(mass_or_name, EvidenceKind::Brno, tail),
            "obs" => Descriptor::new(mass_or_name, EvidenceKind::Observed, tail),
            _ if strict => {
                return Err(BoxedError::new(
                    ProFormaErrorKind::UnknownVocabulary,
                    "Unknown controlled vocabulary",
                    format!(
                        "The prefix '{head}' is not a known key or controlled vocabulary, use one of Formula, Glycan, Info, MOD, UNIMOD, RESID, XLMOD, GNO, or their single letter forms"
                    ),
                    base_context.clone().add_highlight(Highlight::from((0, offset, head.len()))),
                ));
            }
            _ => {
                warning = Some(BoxedError::new(
                    ProFormaErrorKind::FreeTextPrefix,
                    "Unknown prefix",
                    format!(
                        "The prefix '{head}' is not a known key or controlled vocabulary, the whole descriptor is read as a name"
                    ),
                    base_context.clone().add_highlight(Highlight::from((0, offset, head.len()))),
                ));
                Descriptor::name(body)
            }
        }
    } else if body.starts_with(['+', '-']) {
        Descriptor::mass(body)
    } else {
        Descriptor::name(body)
    };

    Ok(Resolved {
        descriptor: Some(descriptor),
        group,
        weight,
        warning,
    })
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Result<(Option<Descriptor>, Option<&str>, f64), ProFormaErrorKind> {
        resolve_descriptor(&Context::none().lines(0, text), text, 0, false)
            .map(|r| (r.descriptor, r.group, r.weight))
            .map_err(|e| e.get_kind().clone())
    }

    fn descriptor(key: KeyKind, evidence: EvidenceKind, value: &str) -> Option<Descriptor> {
        Some(Descriptor::new(key, evidence, value))
    }

    #[test]
    fn names_and_masses() {
        assert_eq!(
            resolve("Phospho"),
            Ok((descriptor(KeyKind::Name, EvidenceKind::None, "Phospho"), None, 0.0))
        );
        assert_eq!(
            resolve("+15.99"),
            Ok((descriptor(KeyKind::Mass, EvidenceKind::None, "+15.99"), None, 0.0))
        );
        assert_eq!(
            resolve("-18.01"),
            Ok((descriptor(KeyKind::Mass, EvidenceKind::None, "-18.01"), None, 0.0))
        );
    }

    #[test]
    fn controlled_vocabularies() {
        assert_eq!(
            resolve("MOD:00719").unwrap().0,
            descriptor(KeyKind::Identifier, EvidenceKind::PsiMod, "MOD:00719")
        );
        assert_eq!(
            resolve("unimod:35").unwrap().0,
            descriptor(KeyKind::Identifier, EvidenceKind::Unimod, "UNIMOD:35")
        );
        assert_eq!(
            resolve("RESID:AA0581").unwrap().0,
            descriptor(KeyKind::Identifier, EvidenceKind::Resid, "AA0581")
        );
        assert_eq!(
            resolve("XLMOD:02001").unwrap().0,
            descriptor(KeyKind::Identifier, EvidenceKind::XlMod, "XLMOD:02001")
        );
        assert_eq!(
            resolve("GNO:G59626AS").unwrap().0,
            descriptor(KeyKind::Identifier, EvidenceKind::Gno, "GNO:G59626AS")
        );
        assert_eq!(
            resolve("Formula:C2H3NO").unwrap().0,
            descriptor(KeyKind::Formula, EvidenceKind::None, "C2H3NO")
        );
        assert_eq!(
            resolve("glycan:Hex").unwrap().0,
            descriptor(KeyKind::Glycan, EvidenceKind::None, "Hex")
        );
        assert_eq!(
            resolve("INFO:checked").unwrap().0,
            descriptor(KeyKind::Info, EvidenceKind::None, "checked")
        );
    }

    #[test]
    fn short_forms() {
        assert_eq!(
            resolve("U:Oxidation").unwrap().0,
            descriptor(KeyKind::Name, EvidenceKind::Unimod, "Oxidation")
        );
        assert_eq!(
            resolve("U:+15.995").unwrap().0,
            descriptor(KeyKind::Mass, EvidenceKind::Unimod, "+15.995")
        );
        assert_eq!(
            resolve("M:00719").unwrap().0,
            descriptor(KeyKind::Name, EvidenceKind::PsiMod, "00719")
        );
        assert_eq!(
            resolve("R:L-methionine sulfone").unwrap().0,
            descriptor(KeyKind::Name, EvidenceKind::Resid, "L-methionine sulfone")
        );
        assert_eq!(
            resolve("X:DSS").unwrap().0,
            descriptor(KeyKind::Name, EvidenceKind::XlMod, "DSS")
        );
        assert_eq!(
            resolve("G:G59626AS").unwrap().0,
            descriptor(KeyKind::Name, EvidenceKind::Gno, "G59626AS")
        );
        assert_eq!(
            resolve("B:Hex").unwrap().0,
            descriptor(KeyKind::Name, EvidenceKind::Brno, "Hex")
        );
        assert_eq!(
            resolve("Obs:+79.978").unwrap().0,
            descriptor(KeyKind::Mass, EvidenceKind::Observed, "+79.978")
        );
    }

    #[test]
    fn unknown_prefix() {
        assert_eq!(
            resolve("XYZ:12345").unwrap().0,
            descriptor(KeyKind::Name, EvidenceKind::None, "XYZ:12345")
        );
        let text = "XYZ:12345";
        let context = Context::none().lines(0, text);
        let lenient = resolve_descriptor(&context, text, 0, false).unwrap();
        assert!(
            lenient
                .warning
                .is_some_and(|w| w.get_kind().clone() == ProFormaErrorKind::FreeTextPrefix)
        );
        assert_eq!(
            resolve_descriptor(&context, text, 0, true)
                .unwrap_err()
                .get_kind()
                .clone(),
            ProFormaErrorKind::UnknownVocabulary
        );
    }

    #[test]
    fn groups() {
        assert_eq!(
            resolve("Phospho#g1"),
            Ok((
                descriptor(KeyKind::Name, EvidenceKind::None, "Phospho"),
                Some("g1"),
                0.0
            ))
        );
        assert_eq!(resolve("#g1(0.25)"), Ok((None, Some("g1"), 0.25)));
        assert_eq!(
            resolve("XLMOD:02001#XL1"),
            Ok((
                descriptor(KeyKind::Identifier, EvidenceKind::XlMod, "XLMOD:02001"),
                Some("XL1"),
                0.0
            ))
        );
        assert_eq!(
            resolve("Pro+O(2)#g2"),
            Ok((
                descriptor(KeyKind::Name, EvidenceKind::None, "Pro+O(2)"),
                Some("g2"),
                0.0
            ))
        );
    }

    #[test]
    fn failures() {
        assert_eq!(resolve(""), Err(ProFormaErrorKind::EmptyDescriptor));
        assert_eq!(resolve("Phospho#"), Err(ProFormaErrorKind::EmptyGroupName));
        assert_eq!(resolve("#(0.5)"), Err(ProFormaErrorKind::EmptyGroupName));
        assert_eq!(resolve("#g1(0.5"), Err(ProFormaErrorKind::MalformedWeight));
        assert_eq!(resolve("#g1(abc)"), Err(ProFormaErrorKind::MalformedWeight));
        assert_eq!(resolve("#g1()"), Err(ProFormaErrorKind::MalformedWeight));
        assert_eq!(resolve("#g1(inf)"), Err(ProFormaErrorKind::MalformedWeight));
    }
}
