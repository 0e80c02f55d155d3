//! Configuration templates and rendering
//!
//! A template is the text of a simulator configuration file with placeholder
//! slots. `{}` slots are numbered automatically, `{N}` slots refer to a
//! parameter position directly, and `{{`/`}}` produce literal braces.
//!
//! A slot that makes up the whole value of a `key: {..}` line is named after
//! its key, which lets experiments supply parameters by name instead of by
//! position. Both forms render to the same bytes.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::Serialize;
use shared::{Experiment, ParamValue, Parameters};
use thiserror::Error;

use crate::error::{OrchestratorError, OrchestratorResult};

/// Highest slot index a template may use
const MAX_SLOT_INDEX: usize = 4096;

/// Why a parameter set does not fit a template
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RenderError {
    #[error("template expects {expected} parameters, got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("no value supplied for field '{0}'")]
    MissingField(String),

    #[error("field '{0}' does not appear in the template")]
    UnknownField(String),

    #[error("slot {0} has no field name, named parameters cannot fill it")]
    UnnamedSlot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Auto,
    Explicit,
}

/// A parsed configuration template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTemplate {
    segments: Vec<Segment>,
    arity: usize,
    slot_names: Vec<Option<String>>,
}

impl ConfigTemplate {
    pub fn parse(text: &str) -> OrchestratorResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut numbering: Option<Numbering> = None;
        let mut auto_index = 0usize;
        let mut arity = 0usize;

        let mut chars = text.char_indices().peekable();
        while let Some((position, ch)) = chars.next() {
            match ch {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(syntax_error(position, "single '}' encountered")),
                '{' => {
                    let mut content = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(syntax_error(position, "nested '{' inside slot")),
                            other => content.push(other),
                        }
                    }
                    if !closed {
                        return Err(syntax_error(position, "unterminated slot"));
                    }

                    let (index, kind) = if content.is_empty() {
                        let index = auto_index;
                        auto_index += 1;
                        (index, Numbering::Auto)
                    } else if content.bytes().all(|b| b.is_ascii_digit()) {
                        let index = content
                            .parse::<usize>()
                            .ok()
                            .filter(|index| *index <= MAX_SLOT_INDEX)
                            .ok_or_else(|| syntax_error(position, "slot index out of range"))?;
                        (index, Numbering::Explicit)
                    } else {
                        return Err(syntax_error(
                            position,
                            &format!("slot '{{{content}}}' is not a positional index"),
                        ));
                    };

                    match numbering {
                        Some(existing) if existing != kind => {
                            return Err(syntax_error(
                                position,
                                "cannot mix automatic '{}' and explicit '{N}' slots",
                            ));
                        }
                        _ => numbering = Some(kind),
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(index));
                    arity = arity.max(index + 1);
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let slot_names = name_slots(&segments, arity);
        Ok(Self {
            segments,
            arity,
            slot_names,
        })
    }

    /// Number of parameters a positional tuple must supply
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Field name of each slot position, if it has one
    pub fn slot_names(&self) -> &[Option<String>] {
        &self.slot_names
    }

    /// Substitute a positional tuple
    pub fn render_positional(&self, values: &[ParamValue]) -> Result<String, RenderError> {
        if values.len() != self.arity {
            return Err(RenderError::Arity {
                expected: self.arity,
                actual: values.len(),
            });
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(index) => {
                    // Writing to a String cannot fail
                    let _ = write!(out, "{}", values[*index]);
                }
            }
        }
        Ok(out)
    }

    /// Substitute named fields, resolved to positions through slot names
    pub fn render_named(&self, fields: &BTreeMap<String, ParamValue>) -> Result<String, RenderError> {
        let mut values = Vec::with_capacity(self.arity);
        for (index, name) in self.slot_names.iter().enumerate() {
            let name = name.as_ref().ok_or(RenderError::UnnamedSlot(index))?;
            let value = fields
                .get(name)
                .ok_or_else(|| RenderError::MissingField(name.clone()))?;
            values.push(value.clone());
        }

        if let Some(unknown) = fields
            .keys()
            .find(|key| !self.slot_names.iter().flatten().any(|name| name == *key))
        {
            return Err(RenderError::UnknownField(unknown.clone()));
        }

        self.render_positional(&values)
    }

    pub fn render(&self, parameters: &Parameters) -> Result<String, RenderError> {
        match parameters {
            Parameters::Positional(values) => self.render_positional(values),
            Parameters::Named(fields) => self.render_named(fields),
        }
    }

    /// Render the configuration text for one experiment
    pub fn render_experiment(&self, experiment: &Experiment) -> OrchestratorResult<String> {
        self.render(experiment.parameters())
            .map_err(|source| OrchestratorError::TemplateMismatch {
                experiment: experiment.name().to_string(),
                source,
            })
    }
}

impl FromStr for ConfigTemplate {
    type Err = OrchestratorError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

fn syntax_error(position: usize, message: &str) -> OrchestratorError {
    OrchestratorError::TemplateSyntax {
        position,
        message: message.to_string(),
    }
}

/// Name each slot that is the entire value of a `key: {..}` line.
/// The first name seen for a position wins.
fn name_slots(segments: &[Segment], arity: usize) -> Vec<Option<String>> {
    let mut names: Vec<Option<String>> = vec![None; arity];

    let mut lines: Vec<Vec<Segment>> = vec![Vec::new()];
    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                let mut parts = text.split('\n');
                if let Some(first) = parts.next() {
                    push_literal(lines.last_mut(), first);
                }
                for part in parts {
                    lines.push(Vec::new());
                    push_literal(lines.last_mut(), part);
                }
            }
            Segment::Slot(index) => {
                if let Some(line) = lines.last_mut() {
                    line.push(Segment::Slot(*index));
                }
            }
        }
    }

    for line in &lines {
        if let [Segment::Literal(prefix), Segment::Slot(index)] = line.as_slice() {
            let key = prefix.strip_suffix(": ").map(str::trim).unwrap_or_default();
            if !key.is_empty() && names[*index].is_none() {
                names[*index] = Some(key.to_string());
            }
        }
    }

    names
}

fn push_literal(line: Option<&mut Vec<Segment>>, text: &str) {
    if let (Some(line), false) = (line, text.is_empty()) {
        line.push(Segment::Literal(text.to_string()));
    }
}
