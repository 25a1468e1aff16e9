//! Path template resolution
//!
//! Schema authors spell the same placeholder as `{robot_id}` in one place
//! and `{robotId}` in another. Names are canonicalized to snake_case on the
//! way in, so one binding serves every spelling.

use std::collections::HashMap;

/// Canonical snake_case form of a placeholder or field name
///
/// `robotId` and `robot_id` both become `robot_id`; an uppercase run only
/// starts one word, so `thingID` becomes `thing_id`.
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for c in name.trim().chars() {
        if c == '-' || c == ' ' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else if c.is_uppercase() {
            if matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}

/// Placeholder values, keyed by canonical name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: HashMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value under any spelling of a name
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(canonical_name(name), value.into());
    }

    /// Builder-style [`Bindings::insert`]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up a value under any spelling of a name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&canonical_name(name)).map(String::as_str)
    }
}

/// Substitute bound `{placeholder}`s in a path template
///
/// Unbound placeholders and stray braces are copied through untouched; the
/// server is left to reject whatever path results.
pub fn resolve(template: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];

        match after_open.find(|c: char| c == '{' || c == '}') {
            Some(close) if after_open.as_bytes()[close] == b'}' => {
                let name = &after_open[..close];
                match bindings.get(name) {
                    Some(value) if !name.is_empty() => out.push_str(value),
                    _ => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after_open[close + 1..];
            }
            _ => {
                // Not a well-formed placeholder; keep the brace literally
                out.push('{');
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}
