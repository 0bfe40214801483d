//! # Template Rendering
//!
//! Minimal mustache-style substitution for header stamping and output
//! filename templates. A template contains `{{identifier}}` placeholders;
//! rendering substitutes each occurrence with its value from a
//! case-sensitive variable mapping.
//!
//! Substitution is single-pass: a placeholder appearing twice is
//! substituted twice, independently, and substituted values are never
//! rescanned for further placeholders. A placeholder whose key is absent
//! from the mapping is a hard error rather than being passed through or
//! blanked out.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{Error, Result};

/// Variable mapping for template rendering. Keys are case-sensitive.
pub type Variables = HashMap<String, String>;

/// Render `template`, substituting every `{{identifier}}` occurrence with
/// its mapped value.
pub fn render(template: &str, vars: &Variables) -> Result<String> {
    let pattern = Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}")?;

    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for captures in pattern.captures_iter(template) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let value = vars.get(name.as_str()).ok_or_else(|| Error::Template {
            message: format!("unresolved template variable '{}'", name.as_str()),
            variable: Some(name.as_str().to_string()),
        })?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&template[last..]);

    Ok(out)
}
