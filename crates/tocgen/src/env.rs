//! Environment variables exposed to templates
//!
//! The master index template can reference process environment variables as
//! `{{ env.NAME }}`. The context is a snapshot taken once per run, so a
//! template renders the same way throughout.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*env\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap())
}

/// Snapshot of environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvContext {
    vars: BTreeMap<String, String>,
}

/// Result of expanding a template
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub text: String,
    /// Referenced names with no value, in first-seen order
    pub missing: Vec<String>,
}

impl EnvContext {
    /// Capture the current process environment
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn from_process() -> Self {
        Self::from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Build a context from explicit pairs
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate variables in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace `{{ env.NAME }}` references with their values
    ///
    /// Unknown names are left as written and listed in [`Expansion::missing`].
    pub fn expand(&self, text: &str) -> Expansion {
        let mut missing: Vec<String> = Vec::new();

        let expanded = reference_regex().replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            match self.vars.get(name) {
                Some(value) => value.clone(),
                None => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });

        Expansion { text: expanded.into_owned(), missing }
    }
}
