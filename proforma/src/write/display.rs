use std::fmt::Display;

use context_error::*;
use itertools::Itertools;

use crate::{
    Descriptor, DiagnosticSink, EvidenceKind, KeyKind, MembershipDescriptor, ProFormaErrorKind,
    Tag, TagGroup, Term, diagnostics::Diagnostics,
};

/// Anything that is written inside the sequence
#[derive(Clone, Copy, Debug)]
enum Annotation<'t> {
    Tag(&'t Tag),
    Member {
        group: &'t TagGroup,
        member: &'t MembershipDescriptor,
        /// The first member of a group carries the value of the group
        first: bool,
    },
}

impl Annotation<'_> {
    const fn start(&self) -> usize {
        match self {
            Self::Tag(tag) => tag.start_index,
            Self::Member { member, .. } => member.start_index,
        }
    }

    const fn end(&self) -> usize {
        match self {
            Self::Tag(tag) => tag.end_index,
            Self::Member { member, .. } => member.end_index,
        }
    }

    const fn is_range(&self) -> bool {
        self.start() != self.end()
    }

    fn text(&self) -> Result<String, BoxedError<'static, ProFormaErrorKind>> {
        match self {
            Self::Tag(tag) => descriptors_text(&tag.descriptors),
            Self::Member {
                group,
                member,
                first,
            } => {
                let mut text = if *first {
                    group
                        .group_value()
                        .descriptor()
                        .map(descriptor_text)
                        .transpose()?
                        .unwrap_or_default()
                } else {
                    String::new()
                };
                text.push('#');
                text.push_str(group.name());
                if member.weight.0 > 0.0 {
                    text.push('(');
                    text.push_str(&member.weight.0.to_string());
                    text.push(')');
                }
                Ok(text)
            }
        }
    }
}

impl Term {
    /// Write this term as a canonical ProForma string.
    ///
    /// The parts are written in a fixed order: global modifications, labile
    /// descriptors, unlocalized tags, N terminal, the sequence with all tags and
    /// group members, and finally the C terminal. Parsing the result and writing
    /// it again gives the exact same string.
    ///
    /// # Errors
    /// If a descriptor has a key and evidence combination that has no text form, if
    /// an annotation is placed outside of the sequence, or if two ranges overlap.
    pub fn to_pro_forma(&self) -> Result<String, BoxedError<'static, ProFormaErrorKind>> {
        self.to_pro_forma_with(None)
    }

    /// Write this term as a canonical ProForma string, sending trace messages to the sink if one is given.
    ///
    /// # Errors
    /// See [`Self::to_pro_forma`].
    pub fn to_pro_forma_with(
        &self,
        sink: Option<&dyn DiagnosticSink>,
    ) -> Result<String, BoxedError<'static, ProFormaErrorKind>> {
        let diagnostics = Diagnostics::new(sink);
        let mut output = String::new();

        for modification in self.global_modifications() {
            let text = descriptors_text(&modification.descriptors)?;
            if modification.is_isotope() {
                output.push('<');
                output.push_str(&text);
                output.push('>');
            } else {
                output.push_str("<[");
                output.push_str(&text);
                output.push_str("]@");
                output.push_str(&modification.targets.iter().join(","));
                output.push('>');
            }
        }
        for descriptor in self.labile_descriptors() {
            output.push('{');
            output.push_str(&descriptor_text(descriptor)?);
            output.push('}');
        }
        for tag in self.unlocalized_tags() {
            output.push('[');
            output.push_str(&descriptors_text(&tag.descriptors)?);
            output.push(']');
            if tag.count > 1 {
                output.push('^');
                output.push_str(&tag.count.to_string());
            }
        }
        if !self.unlocalized_tags().is_empty() {
            output.push('?');
        }
        if !self.n_terminal_descriptors().is_empty() {
            output.push('[');
            output.push_str(&descriptors_text(self.n_terminal_descriptors())?);
            output.push_str("]-");
        }

        self.write_sequence(&mut output, diagnostics)?;

        if !self.c_terminal_descriptors().is_empty() {
            output.push_str("-[");
            output.push_str(&descriptors_text(self.c_terminal_descriptors())?);
            output.push(']');
        }
        Ok(output)
    }

    /// Write the sequence with all tags and group members interleaved
    fn write_sequence(
        &self,
        output: &mut String,
        diagnostics: Diagnostics<'_>,
    ) -> Result<(), BoxedError<'static, ProFormaErrorKind>> {
        let length = self.len();
        let mut annotations = self
            .tags()
            .iter()
            .filter(|tag| !tag.descriptors.is_empty())
            .map(Annotation::Tag)
            .chain(self.tag_groups().values().flat_map(|group| {
                group
                    .members()
                    .iter()
                    .enumerate()
                    .map(move |(index, member)| Annotation::Member {
                        group,
                        member,
                        first: index == 0,
                    })
            }))
            .collect_vec();
        if let Some(annotation) = annotations
            .iter()
            .find(|a| a.start() > a.end() || a.end() >= length)
        {
            return Err(BoxedError::new(
                ProFormaErrorKind::AnnotationOutOfBounds,
                "Annotation out of bounds",
                format!(
                    "An annotation is placed on residues {} to {} but the sequence has {length} residues",
                    annotation.start(),
                    annotation.end(),
                ),
                Context::full_line(0, &annotation.text().unwrap_or_default()).to_owned(),
            ));
        }
        annotations.sort_by_key(Annotation::start);
        diagnostic!(diagnostics, "sorted annotations: {annotations:?}");

        let mut cursor = 0;
        // The open range as (start, end inclusive, texts)
        let mut range: Option<(usize, usize, Vec<String>)> = None;
        for (index, residue) in self.sequence().chars().enumerate() {
            let mut single = Vec::new();
            let mut opened = false;
            while cursor < annotations.len() && annotations[cursor].start() == index {
                let annotation = annotations[cursor];
                cursor += 1;
                if !annotation.is_range() {
                    single.push(annotation.text()?);
                    continue;
                }
                match &mut range {
                    Some((start, end, texts)) if *start == index && *end == annotation.end() => {
                        texts.push(annotation.text()?);
                    }
                    Some((start, end, _)) => {
                        return Err(BoxedError::new(
                            ProFormaErrorKind::OverlappingRange,
                            "Overlapping ranges",
                            format!(
                                "The range on residues {index} to {} overlaps with the range on residues {start} to {end}",
                                annotation.end()
                            ),
                            Context::full_line(0, self.sequence()).to_owned(),
                        ));
                    }
                    None => {
                        range = Some((index, annotation.end(), vec![annotation.text()?]));
                        opened = true;
                    }
                }
            }
            if opened {
                output.push('(');
            }
            output.push(residue);
            if !single.is_empty() {
                output.push('[');
                output.push_str(&single.join("|"));
                output.push(']');
            }
            if let Some((_, end, texts)) = &range
                && *end == index
            {
                output.push_str(")[");
                output.push_str(&texts.join("|"));
                output.push(']');
                range = None;
            }
        }
        Ok(())
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_pro_forma().map_err(|_| std::fmt::Error)?)
    }
}

fn descriptors_text(
    descriptors: &[Descriptor],
) -> Result<String, BoxedError<'static, ProFormaErrorKind>> {
    Ok(descriptors
        .iter()
        .map(descriptor_text)
        .collect::<Result<Vec<_>, _>>()?
        .join("|"))
}

/// The text form of a single descriptor, the reverse of the prefix table used when parsing
fn descriptor_text(
    descriptor: &Descriptor,
) -> Result<String, BoxedError<'static, ProFormaErrorKind>> {
    let value = &descriptor.value;
    let prefix = match (descriptor.key, descriptor.evidence) {
        (KeyKind::Name | KeyKind::Mass, evidence) => match evidence {
            EvidenceKind::None => "",
            EvidenceKind::Observed => "Obs:",
            EvidenceKind::Unimod => "U:",
            EvidenceKind::Resid => "R:",
            EvidenceKind::PsiMod => "M:",
            EvidenceKind::XlMod => "X:",
            EvidenceKind::Gno => "G:",
            EvidenceKind::Brno => "B:",
            EvidenceKind::UniProt => return Err(unwritable(descriptor)),
        },
        (
            KeyKind::Identifier,
            EvidenceKind::Unimod | EvidenceKind::PsiMod | EvidenceKind::XlMod | EvidenceKind::Gno,
        ) => "",
        (KeyKind::Identifier, EvidenceKind::Resid) => "RESID:",
        (KeyKind::Formula, EvidenceKind::None) => "Formula:",
        (KeyKind::Glycan, EvidenceKind::None) => "Glycan:",
        (KeyKind::Info, EvidenceKind::None) => "Info:",
        _ => return Err(unwritable(descriptor)),
    };
    Ok(format!("{prefix}{value}"))
}

fn unwritable(descriptor: &Descriptor) -> BoxedError<'static, ProFormaErrorKind> {
    BoxedError::new(
        ProFormaErrorKind::UnwritableDescriptor,
        "Unwritable descriptor",
        format!(
            "A descriptor with key {:?} and evidence {:?} has no ProForma text form",
            descriptor.key, descriptor.evidence
        ),
        Context::full_line(0, &descriptor.value).to_owned(),
    )
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_prefixes() {
        for (descriptor, text) in [
            (Descriptor::name("Phospho"), "Phospho"),
            (Descriptor::mass("+15.995"), "+15.995"),
            (
                Descriptor::new(KeyKind::Mass, EvidenceKind::Observed, "+79.978"),
                "Obs:+79.978",
            ),
            (
                Descriptor::new(KeyKind::Name, EvidenceKind::Unimod, "Oxidation"),
                "U:Oxidation",
            ),
            (
                Descriptor::new(KeyKind::Identifier, EvidenceKind::Unimod, "UNIMOD:35"),
                "UNIMOD:35",
            ),
            (
                Descriptor::new(KeyKind::Identifier, EvidenceKind::Resid, "AA0581"),
                "RESID:AA0581",
            ),
            (
                Descriptor::new(KeyKind::Formula, EvidenceKind::None, "C2H3NO"),
                "Formula:C2H3NO",
            ),
            (
                Descriptor::new(KeyKind::Info, EvidenceKind::None, "checked"),
                "Info:checked",
            ),
        ] {
            assert_eq!(descriptor_text(&descriptor).unwrap(), text);
        }
    }

    #[test]
    fn unwritable_descriptors() {
        for descriptor in [
            Descriptor::new(KeyKind::Name, EvidenceKind::UniProt, "x"),
            Descriptor::new(KeyKind::Identifier, EvidenceKind::None, "x"),
            Descriptor::new(KeyKind::Identifier, EvidenceKind::Brno, "x"),
            Descriptor::new(KeyKind::Formula, EvidenceKind::Unimod, "x"),
            Descriptor::new(KeyKind::None, EvidenceKind::None, "x"),
        ] {
            assert_eq!(
                descriptor_text(&descriptor).unwrap_err().get_kind().clone(),
                ProFormaErrorKind::UnwritableDescriptor
            );
        }
    }
}
