//! Output format templates.
//!
//! A template is a plain string with `{file_name}` and `{library_name}`
//! placeholders, rendered once per ordered file. The `#{file_name}` spelling
//! used by older scripts is accepted as well.

use std::collections::BTreeMap;

/// Default template: one file name per line.
pub const DEFAULT_FORMAT: &str = "{file_name}";

/// Variables available for placeholder interpolation.
pub struct FormatContext {
    vars: BTreeMap<String, String>,
}

impl FormatContext {
    /// Create a context with the standard per-file variables.
    pub fn new(file_name: &str, library_name: &str) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("file_name".to_string(), file_name.to_string());
        vars.insert("library_name".to_string(), library_name.to_string());
        Self { vars }
    }
}

/// Replace all `{key}` and `#{key}` placeholders in `input` with values from `ctx`.
/// Unknown keys are left intact.
pub fn interpolate(input: &str, ctx: &FormatContext) -> String {
    let mut result = input.to_string();
    for (key, value) in &ctx.vars {
        result = result.replace(&format!("#{{{key}}}"), value);
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}
