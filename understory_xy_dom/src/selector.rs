// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simple selectors.
//!
//! Supported: `TAG`, `#id`, `.class`, compounds such as `BUTTON.primary#ok`,
//! and comma-separated lists of those. Combinators, attribute selectors and
//! pseudo-classes are not supported; such selectors never match.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::types::ElementData;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
}

impl Compound {
    fn matches(&self, data: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(&data.tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && data.attribute("id") != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| data.has_class(c))
    }
}

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse `input`. Returns `None` for unsupported or malformed selectors.
    pub fn parse(input: &str) -> Option<Self> {
        let alternatives = input
            .split(',')
            .map(|part| parse_compound(part.trim()))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { alternatives })
    }

    /// Whether `data` matches any alternative.
    pub fn matches(&self, data: &ElementData) -> bool {
        self.alternatives.iter().any(|c| c.matches(data))
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(input: &str) -> Option<Compound> {
    if input.is_empty() {
        return None;
    }
    let mut compound = Compound::default();
    let mut rest = input;

    let tag_len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
    if tag_len > 0 {
        compound.tag = Some(rest[..tag_len].to_string());
        rest = &rest[tag_len..];
    }

    while let Some(sigil) = rest.chars().next() {
        let body = &rest[sigil.len_utf8()..];
        let len = body.find(|c: char| !is_name_char(c)).unwrap_or(body.len());
        if len == 0 {
            return None;
        }
        let name = body[..len].to_string();
        match sigil {
            '#' => compound.id = Some(name),
            '.' => compound.classes.push(name),
            _ => return None,
        }
        rest = &body[len..];
    }
    Some(compound)
}
