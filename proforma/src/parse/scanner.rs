//! The single pass scanner that turns a ProForma line into a [`Term`].

use context_error::*;
use indexmap::IndexMap;
use thin_vec::ThinVec;

use super::{ParserSettings, resolve::resolve_descriptor};
use crate::{
    Descriptor, EvidenceKind, GlobalModification, KeyKind, MembershipDescriptor, ParserResult,
    ProFormaErrorKind, Tag, TagGroup, Term, UnlocalizedTag,
    diagnostics::Diagnostics,
    helper_functions::{brackets_balanced, explain_number_error, first_unenclosed},
};

/// What the scanner is currently reading, all indices are character indices of the opening delimiter
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scope {
    Residues,
    Tag { start: usize, depth: usize },
    Labile { start: usize, depth: usize },
    Global { start: usize },
}

/// The state of a parenthesised range, in residue indices with an exclusive end
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Range {
    None,
    Open(usize),
    Closed(usize, usize),
}

pub(super) struct Scanner<'a, 's> {
    base_context: Context<'a>,
    line: &'a str,
    chars: Vec<(usize, char)>,
    settings: ParserSettings,
    diagnostics: Diagnostics<'s>,
    warnings: Vec<BoxedError<'a, ProFormaErrorKind>>,
    sequence: String,
    residues: usize,
    tags: Vec<Tag>,
    n_terminal: ThinVec<Descriptor>,
    c_terminal: ThinVec<Descriptor>,
    labile: ThinVec<Descriptor>,
    unlocalized: Vec<UnlocalizedTag>,
    tag_groups: IndexMap<String, TagGroup>,
    global_modifications: Vec<GlobalModification>,
    n_terminal_seen: bool,
    /// Character index of the C terminal marker
    c_terminal_marker: Option<usize>,
    c_terminal_tagged: bool,
    range: Range,
    /// Character index of the ambiguity marker, only the first unenclosed `?` counts
    ambiguity: Option<usize>,
}

impl<'a, 's> Scanner<'a, 's> {
    pub(super) fn new(
        base_context: Context<'a>,
        line: &'a str,
        settings: ParserSettings,
        diagnostics: Diagnostics<'s>,
    ) -> Self {
        let ambiguity = first_unenclosed(line, '?');
        diagnostic!(diagnostics, "ambiguity marker index: {ambiguity:?}");
        Self {
            base_context,
            line,
            chars: line.char_indices().collect(),
            settings,
            diagnostics,
            warnings: Vec::new(),
            sequence: String::new(),
            residues: 0,
            tags: Vec::new(),
            n_terminal: ThinVec::new(),
            c_terminal: ThinVec::new(),
            labile: ThinVec::new(),
            unlocalized: Vec::new(),
            tag_groups: IndexMap::new(),
            global_modifications: Vec::new(),
            n_terminal_seen: false,
            c_terminal_marker: None,
            c_terminal_tagged: false,
            range: Range::None,
            ambiguity,
        }
    }

    /// Scan the full line. On failure the warnings found so far are returned followed by the error.
    pub(super) fn run(mut self) -> ParserResult<'a, Term, ProFormaErrorKind> {
        if self.line.is_empty() {
            return Err(vec![BoxedError::new(
                ProFormaErrorKind::EmptyInput,
                "Empty ProForma",
                "The ProForma definition is empty",
                self.base_context.clone(),
            )]);
        }
        match self.scan() {
            Ok(()) => {
                let warnings = std::mem::take(&mut self.warnings);
                Ok((self.into_term(), warnings))
            }
            Err(error) => {
                self.warnings.push(error);
                Err(self.warnings)
            }
        }
    }

    fn into_term(self) -> Term {
        Term::from_parts(
            self.sequence,
            self.tags,
            self.n_terminal,
            self.c_terminal,
            self.labile,
            self.unlocalized,
            self.tag_groups,
            self.global_modifications,
        )
    }

    fn scan(&mut self) -> Result<(), BoxedError<'a, ProFormaErrorKind>> {
        let mut scope = Scope::Residues;
        let mut index = 0;
        while index < self.chars.len() {
            let ch = self.chars[index].1;
            match (scope, ch) {
                (Scope::Global { start }, '>') => {
                    self.close_global(start, index)?;
                    scope = Scope::Residues;
                }
                (Scope::Global { .. }, _) => (),
                (Scope::Tag { start, depth }, '[') => {
                    scope = Scope::Tag {
                        start,
                        depth: depth + 1,
                    };
                }
                (Scope::Tag { start, depth: 0 }, ']') => {
                    index = self.close_bracket(start, index)?;
                    scope = Scope::Residues;
                }
                (Scope::Tag { start, depth }, ']') => {
                    scope = Scope::Tag {
                        start,
                        depth: depth - 1,
                    };
                }
                (Scope::Tag { .. }, _) => (),
                (Scope::Labile { start, depth }, '{') => {
                    scope = Scope::Labile {
                        start,
                        depth: depth + 1,
                    };
                }
                (Scope::Labile { start, depth: 0 }, '}') => {
                    self.close_labile(start, index)?;
                    scope = Scope::Residues;
                }
                (Scope::Labile { start, depth }, '}') => {
                    scope = Scope::Labile {
                        start,
                        depth: depth - 1,
                    };
                }
                (Scope::Labile { .. }, _) => (),
                (Scope::Residues, '<') => scope = Scope::Global { start: index },
                (Scope::Residues, '[') => scope = Scope::Tag {
                    start: index,
                    depth: 0,
                },
                (Scope::Residues, '{') => scope = Scope::Labile {
                    start: index,
                    depth: 0,
                },
                (Scope::Residues, ']') => {
                    return Err(self.error(
                        ProFormaErrorKind::UnbalancedBrackets,
                        "Unbalanced brackets",
                        "There is 1 more closing bracket than opening brackets",
                        index,
                        index + 1,
                    ));
                }
                (Scope::Residues, '}') => {
                    return Err(self.error(
                        ProFormaErrorKind::UnbalancedBraces,
                        "Unbalanced braces",
                        "There is 1 more closing brace than opening braces",
                        index,
                        index + 1,
                    ));
                }
                (Scope::Residues, '(') => self.open_range(index)?,
                (Scope::Residues, ')') => self.close_range(index)?,
                (Scope::Residues, '-') => {
                    if let Some(marker) = self.c_terminal_marker {
                        return Err(self.error(
                            ProFormaErrorKind::DuplicateCTerminalMarker,
                            "Duplicate C terminal marker",
                            format!(
                                "A C terminal marker '-' was already placed at position {}, only one C terminal segment can be defined",
                                marker + 1
                            ),
                            index,
                            index + 1,
                        ));
                    }
                    diagnostic!(self.diagnostics, "C terminal marker at {index}");
                    self.c_terminal_marker = Some(index);
                }
                (Scope::Residues, '?') if self.ambiguity == Some(index) => (),
                (Scope::Residues, residue) if residue.is_ascii_uppercase() => {
                    if self.c_terminal_marker.is_some() {
                        return Err(self.error(
                            ProFormaErrorKind::ResidueAfterCTerminal,
                            "Residue after C terminal",
                            "No residues can follow the C terminal marker '-'",
                            index,
                            index + 1,
                        ));
                    }
                    self.sequence.push(residue);
                    self.residues += 1;
                }
                (Scope::Residues, other) => {
                    return Err(self.error(
                        ProFormaErrorKind::InvalidResidueCharacter,
                        "Invalid residue",
                        format!(
                            "The character '{other}' is not a valid residue, only upper case letters are allowed in the sequence"
                        ),
                        index,
                        index + 1,
                    ));
                }
            }
            index += 1;
        }

        let end = self.chars.len();
        match scope {
            Scope::Residues => (),
            Scope::Tag { start, depth } => {
                return Err(self.error(
                    ProFormaErrorKind::UnbalancedBrackets,
                    "Unbalanced brackets",
                    format!(
                        "There {} more opening brackets than closing brackets",
                        if depth == 0 {
                            "is 1".to_string()
                        } else {
                            format!("are {}", depth + 1)
                        }
                    ),
                    start,
                    end,
                ));
            }
            Scope::Labile { start, depth } => {
                return Err(self.error(
                    ProFormaErrorKind::UnbalancedBraces,
                    "Unbalanced braces",
                    format!(
                        "There {} more opening braces than closing braces",
                        if depth == 0 {
                            "is 1".to_string()
                        } else {
                            format!("are {}", depth + 1)
                        }
                    ),
                    start,
                    end,
                ));
            }
            Scope::Global { start } => {
                return Err(self.error(
                    ProFormaErrorKind::UnclosedGlobalModification,
                    "Unclosed global modification",
                    "A global modification was opened with '<' but never closed with '>'",
                    start,
                    end,
                ));
            }
        }
        match self.range {
            Range::None => (),
            Range::Open(start) => {
                return Err(self.error(
                    ProFormaErrorKind::UnclosedRange,
                    "Unclosed range",
                    format!(
                        "The range starting at residue {} is never closed with ')'",
                        start + 1
                    ),
                    0,
                    end,
                ));
            }
            Range::Closed(start, stop) => {
                return Err(self.error(
                    ProFormaErrorKind::RangeNotFollowedByTag,
                    "Range without modification",
                    format!(
                        "The range of residues {} to {} is not modified, a range has to be followed by a positioned tag",
                        start + 1,
                        stop
                    ),
                    0,
                    end,
                ));
            }
        }
        if let Some(marker) = self.c_terminal_marker
            && !self.c_terminal_tagged
        {
            return Err(self.error(
                ProFormaErrorKind::DanglingCTerminalMarker,
                "Dangling C terminal marker",
                "The C terminal marker '-' has to be followed by a C terminal tag",
                marker,
                marker + 1,
            ));
        }
        if self.residues == 0
            && self.n_terminal.is_empty()
            && self.c_terminal.is_empty()
            && self.labile.is_empty()
            && self.unlocalized.is_empty()
            && self.global_modifications.is_empty()
        {
            return Err(self.error(
                ProFormaErrorKind::EmptyInput,
                "Empty ProForma",
                "The ProForma definition does not define any residues or modifications",
                0,
                end,
            ));
        }
        Ok(())
    }

    /// Build an error highlighting the given character range (end exclusive)
    fn error(
        &self,
        kind: ProFormaErrorKind,
        short: &'static str,
        long: impl Into<String>,
        start: usize,
        end: usize,
    ) -> BoxedError<'a, ProFormaErrorKind> {
        let from = self.byte_offset(start);
        let to = self.byte_offset(end);
        BoxedError::new(
            kind,
            short,
            long.into(),
            self.base_context
                .clone()
                .add_highlight(Highlight::from((0, from, (to - from).max(1)))),
        )
    }

    /// The byte offset of the given character index, the line length for the end of the line
    fn byte_offset(&self, index: usize) -> usize {
        self.chars.get(index).map_or(self.line.len(), |c| c.0)
    }

    /// The text between the delimiters at the given character indices and its byte offset
    fn enclosed(&self, open: usize, close: usize) -> (&'a str, usize) {
        let line = self.line;
        let from = self.chars[open].0 + self.chars[open].1.len_utf8();
        (&line[from..self.chars[close].0], from)
    }

    fn next_char(&self, index: usize) -> Option<char> {
        self.chars.get(index + 1).map(|c| c.1)
    }

    fn last_residue(&self) -> Option<(usize, usize)> {
        self.residues.checked_sub(1).map(|last| (last, last))
    }

    fn open_range(&mut self, index: usize) -> Result<(), BoxedError<'a, ProFormaErrorKind>> {
        if self.range != Range::None {
            return Err(self.error(
                ProFormaErrorKind::OverlappingRange,
                "Overlapping ranges",
                "A range cannot be opened while another range is still open or not yet modified",
                index,
                index + 1,
            ));
        }
        self.range = Range::Open(self.residues);
        Ok(())
    }

    fn close_range(&mut self, index: usize) -> Result<(), BoxedError<'a, ProFormaErrorKind>> {
        let Range::Open(start) = self.range else {
            return Err(self.error(
                ProFormaErrorKind::UnopenedRange,
                "Unopened range",
                "A range was closed with ')' but no range was opened with '('",
                index,
                index + 1,
            ));
        };
        if start == self.residues {
            return Err(self.error(
                ProFormaErrorKind::EmptyRange,
                "Empty range",
                "A range has to contain at least one residue",
                index.saturating_sub(1),
                index + 1,
            ));
        }
        if self.next_char(index) != Some('[') {
            return Err(self.error(
                ProFormaErrorKind::RangeNotFollowedByTag,
                "Range without modification",
                "A range has to be directly followed by a tag, like '(ACD)[Phospho]'",
                index,
                index + 1,
            ));
        }
        diagnostic!(
            self.diagnostics,
            "range closed on residues {start} to {}",
            self.residues - 1
        );
        self.range = Range::Closed(start, self.residues);
        Ok(())
    }

    /// Handle a closed bracketed tag, returns the index of the last consumed character.
    /// A closed range is always cleared, whichever kind of tag follows it.
    fn close_bracket(
        &mut self,
        open: usize,
        close: usize,
    ) -> Result<usize, BoxedError<'a, ProFormaErrorKind>> {
        let last = self.place_bracket(open, close)?;
        if let Range::Closed(..) = self.range {
            self.range = Range::None;
        }
        Ok(last)
    }

    fn place_bracket(
        &mut self,
        open: usize,
        close: usize,
    ) -> Result<usize, BoxedError<'a, ProFormaErrorKind>> {
        let (text, offset) = self.enclosed(open, close);

        if self.residues > 0 && self.next_char(close) == Some('[') {
            return Err(self.error(
                ProFormaErrorKind::AdjacentTagsNotAllowed,
                "Adjacent tags",
                "Multiple tags on the same position have to be combined in one tag separated by '|', like '[Oxidation|Phospho]'",
                open,
                close + 2,
            ));
        }

        if self.c_terminal_marker.is_some() {
            diagnostic!(self.diagnostics, "tag '{text}' is C terminal");
            let descriptors = self.resolve_tag(text, offset, None)?;
            self.c_terminal.extend(descriptors);
            self.c_terminal_tagged = true;
            return Ok(close);
        }

        if self.residues == 0 && self.next_char(close) == Some('-') {
            diagnostic!(self.diagnostics, "tag '{text}' is N terminal");
            let descriptors = self.resolve_tag(text, offset, None)?;
            self.n_terminal.extend(descriptors);
            self.n_terminal_seen = true;
            return Ok(close + 1);
        }

        if self.ambiguity.is_some_and(|ambiguity| close < ambiguity) {
            diagnostic!(self.diagnostics, "tag '{text}' is unlocalized");
            return self.close_unlocalized(open, close, text, offset);
        }

        if self.residues == 0 {
            return Err(self.error(
                ProFormaErrorKind::MissingNTerminalContext,
                "Tag without residue",
                "A tag before the sequence has to be an N terminal tag ('[Acetyl]-') or an unlocalized tag ('[Phospho]?')",
                open,
                close + 1,
            ));
        }

        let anchor = if let Range::Closed(start, end) = self.range {
            (start, end - 1)
        } else {
            self.last_residue().unwrap_or_default()
        };
        diagnostic!(
            self.diagnostics,
            "tag '{text}' is placed on residues {} to {}",
            anchor.0,
            anchor.1
        );
        let descriptors = self.resolve_tag(text, offset, Some(anchor))?;
        if !descriptors.is_empty() {
            self.tags.push(Tag {
                start_index: anchor.0,
                end_index: anchor.1,
                descriptors,
            });
        }
        Ok(close)
    }

    fn close_unlocalized(
        &mut self,
        open: usize,
        close: usize,
        text: &'a str,
        offset: usize,
    ) -> Result<usize, BoxedError<'a, ProFormaErrorKind>> {
        if self.n_terminal_seen {
            return Err(self.error(
                ProFormaErrorKind::UnlocalizedAfterNTerminal,
                "Unlocalized tag after N terminal",
                "Unlocalized tags have to be placed before the N terminal tag",
                open,
                close + 1,
            ));
        }
        let descriptors = self.resolve_tag(text, offset, None)?;

        let mut last = close;
        let mut count = 1;
        if self.next_char(close) == Some('^') {
            last = close + 1;
            while self
                .next_char(last)
                .is_some_and(|c| c.is_ascii_digit())
            {
                last += 1;
            }
            let from = self.byte_offset(close + 2);
            let to = self.byte_offset(last + 1);
            count = self.line[from..to].parse::<u32>().map_err(|err| {
                self.error(
                    ProFormaErrorKind::MalformedMultiplicity,
                    "Invalid multiplicity",
                    format!("The multiplicity {}", explain_number_error(&err)),
                    close + 1,
                    last + 1,
                )
            })?;
            if count == 0 {
                return Err(self.error(
                    ProFormaErrorKind::MalformedMultiplicity,
                    "Invalid multiplicity",
                    "The multiplicity has to be at least 1",
                    close + 1,
                    last + 1,
                ));
            }
        }
        if !descriptors.is_empty() {
            self.unlocalized.push(UnlocalizedTag { count, descriptors });
        }
        Ok(last)
    }

    fn close_labile(
        &mut self,
        open: usize,
        close: usize,
    ) -> Result<(), BoxedError<'a, ProFormaErrorKind>> {
        let (text, offset) = self.enclosed(open, close);
        diagnostic!(self.diagnostics, "tag '{text}' is labile");
        let descriptors = self.resolve_tag(text, offset, self.last_residue())?;
        self.labile.extend(descriptors);
        Ok(())
    }

    fn close_global(
        &mut self,
        open: usize,
        close: usize,
    ) -> Result<(), BoxedError<'a, ProFormaErrorKind>> {
        if self.residues != 0
            || !self.unlocalized.is_empty()
            || self.n_terminal_seen
            || !self.tag_groups.is_empty()
        {
            return Err(self.error(
                ProFormaErrorKind::MisplacedGlobalModification,
                "Misplaced global modification",
                "Global modifications have to be placed at the very start of the definition",
                open,
                close + 1,
            ));
        }
        let (text, offset) = self.enclosed(open, close);

        let modification = if let Some(at) = text.rfind('@') {
            let Some(inner) = text[..at]
                .strip_prefix('[')
                .and_then(|inner| inner.strip_suffix(']'))
            else {
                return Err(self.error(
                    ProFormaErrorKind::InvalidGlobalModification,
                    "Invalid global modification",
                    "The modification of a fixed global modification has to be enclosed in brackets, like '<[Carbamidomethyl]@C>'",
                    open,
                    close + 1,
                ));
            };
            let mut targets = Vec::new();
            for (position, target) in text[at + 1..].char_indices() {
                match target {
                    ',' => (),
                    target if target.is_ascii_uppercase() => {
                        if !targets.contains(&target) {
                            targets.push(target);
                        }
                    }
                    other => {
                        let byte = offset + at + 1 + position;
                        return Err(BoxedError::new(
                            ProFormaErrorKind::InvalidGlobalTarget,
                            "Invalid global modification target",
                            format!(
                                "The target '{other}' is not valid, the targets of a global modification are upper case residue letters separated by commas"
                            ),
                            self.base_context
                                .clone()
                                .add_highlight(Highlight::from((0, byte, other.len_utf8()))),
                        ));
                    }
                }
            }
            if targets.is_empty() {
                return Err(self.error(
                    ProFormaErrorKind::InvalidGlobalTarget,
                    "Missing global modification target",
                    "A fixed global modification needs at least one target residue after the '@'",
                    open,
                    close + 1,
                ));
            }
            let descriptors = self.resolve_tag(inner, offset + 1, None)?;
            GlobalModification::fixed(descriptors, targets)
        } else {
            GlobalModification::isotope(self.resolve_tag(text, offset, None)?)
        };

        diagnostic!(
            self.diagnostics,
            "global modification '{text}' with targets {:?}",
            modification.targets
        );
        if !modification.descriptors.is_empty() {
            self.global_modifications.push(modification);
        }
        Ok(())
    }

    /// Resolve the full text of a tag into its descriptors. Descriptors with a group name
    /// are added to their group (with a member at the anchor if there is one) instead.
    fn resolve_tag(
        &mut self,
        text: &'a str,
        offset: usize,
        anchor: Option<(usize, usize)>,
    ) -> Result<ThinVec<Descriptor>, BoxedError<'a, ProFormaErrorKind>> {
        let mut descriptors = ThinVec::new();
        let mut part_offset = offset;
        for part in text.split('|') {
            let trimmed = part.trim_start();
            let start = part_offset + part.len() - trimmed.len();
            part_offset += part.len() + 1;

            let resolved =
                resolve_descriptor(&self.base_context, trimmed, start, self.settings.strict)?;
            if let Some(name) = resolved.group
                && !(brackets_balanced(name)
                    && resolved
                        .descriptor
                        .as_ref()
                        .is_none_or(|d| brackets_balanced(&d.value)))
            {
                return Err(BoxedError::new(
                    ProFormaErrorKind::UnbalancedBrackets,
                    "Unbalanced brackets in group",
                    "The name and value of a tag group are written inside a tag, so their square brackets have to be balanced",
                    self.base_context
                        .clone()
                        .add_highlight(Highlight::from((0, start, trimmed.len().max(1)))),
                ));
            }
            if let Some(warning) = resolved.warning {
                self.warnings.push(warning);
            }
            diagnostic!(
                self.diagnostics,
                "resolved '{trimmed}' to {:?} in group {:?} with weight {}",
                resolved.descriptor,
                resolved.group,
                resolved.weight
            );

            match (resolved.group, resolved.descriptor) {
                (Some(name), descriptor) => {
                    let diagnostics = self.diagnostics;
                    let group = self.tag_groups.entry(name.to_string()).or_insert_with(|| {
                        diagnostic!(diagnostics, "new tag group '{name}'");
                        TagGroup::pending(
                            name,
                            descriptor.as_ref().map_or(KeyKind::None, |d| d.key),
                            descriptor
                                .as_ref()
                                .map_or(EvidenceKind::None, |d| d.evidence),
                        )
                    });
                    if let Some(descriptor) = descriptor {
                        if let Err(rejected) = group.set_value(descriptor) {
                            return Err(BoxedError::new(
                                ProFormaErrorKind::GroupValueAlreadySet,
                                "Group value already set",
                                format!(
                                    "The value of group '{name}' was already set to '{}', it cannot be set again to '{}', use '#{name}' to only reference the group",
                                    group.value(),
                                    rejected.value
                                ),
                                self.base_context
                                    .clone()
                                    .add_highlight(Highlight::from((0, start, trimmed.len().max(1)))),
                            ));
                        }
                        diagnostic!(self.diagnostics, "value of group '{name}' set");
                    }
                    if let Some((from, to)) = anchor {
                        group.add_member(MembershipDescriptor::ranged(from, to, resolved.weight));
                        diagnostic!(
                            self.diagnostics,
                            "member {from} to {to} added to group '{name}'"
                        );
                    }
                }
                (None, Some(descriptor)) => descriptors.push(descriptor),
                (None, None) => {
                    return Err(BoxedError::new(
                        ProFormaErrorKind::EmptyDescriptor,
                        "Empty descriptor",
                        "A descriptor cannot be empty",
                        self.base_context
                            .clone()
                            .add_highlight(Highlight::from((0, start.saturating_sub(1), 1))),
                    ));
                }
            }
        }
        Ok(descriptors)
    }
}
