// src/report/template.rs

//! Minimal `{{ name }}` placeholder templates.
//!
//! Values are inserted verbatim; callers escape through [`Context::text`].
//! A placeholder with no value in the context is an error, so a template
//! that drifts from the renderer fails loudly instead of shipping blanks.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AppError, Result};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Values available to a template.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert plain text, HTML-escaped.
    pub fn text(&mut self, key: &str, value: impl AsRef<str>) -> &mut Self {
        let escaped = html_escape::encode_quoted_attribute(value.as_ref()).into_owned();
        self.values.insert(key.to_string(), escaped);
        self
    }

    /// Insert markup that is already safe.
    pub fn html(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// A named template source.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
}

impl Template {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placeholder names in order of appearance, duplicates included.
    pub fn placeholders(&self) -> Vec<&str> {
        placeholder_pattern()
            .captures_iter(&self.source)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Substitute every placeholder from `ctx`.
    pub fn render(&self, ctx: &Context) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        let mut last = 0;

        for caps in placeholder_pattern().captures_iter(&self.source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = ctx.get(name.as_str()).ok_or_else(|| {
                AppError::template(
                    &self.name,
                    format!("no value for placeholder '{}'", name.as_str()),
                )
            })?;
            out.push_str(&self.source[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }
        out.push_str(&self.source[last..]);

        Ok(out)
    }
}
