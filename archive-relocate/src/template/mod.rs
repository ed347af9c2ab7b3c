//! Target path templates with slice-aware placeholders.
//!
//! Templates use `$name` or `${name}` placeholders, optionally followed by a
//! `[start:stop]` slice that selects characters of the resolved value:
//!
//! ```
//! use archive_relocate::template::SlicedTemplate;
//! use std::collections::HashMap;
//!
//! let template = SlicedTemplate::parse("$x[:2]/$x/$missing").unwrap();
//! let vars: HashMap<String, String> = [("x".to_string(), "abcdef".to_string())].into();
//! assert_eq!(template.safe_substitute(&vars), "ab/abcdef/$missing");
//! ```
//!
//! Rendering never fails: placeholders with no value are copied to the output
//! verbatim. Structural problems such as an unclosed `${` are reported once,
//! when the template is parsed.

mod parser;
mod slice;
mod vars;

pub use parser::{Placeholder, Segment, TemplateError};
pub use slice::Slice;
pub use vars::{value_text, LayeredVars, VariableSource};

use std::fmt;
use std::str::FromStr;

/// A parsed target path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlicedTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl SlicedTemplate {
    /// Parse a template, rejecting malformed braced placeholders.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            source: template.to_string(),
            segments: parser::parse(template)?,
        })
    }

    /// The template text this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names referenced by the template, in order of appearance.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p.name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Render the template, leaving unknown placeholders untouched.
    pub fn safe_substitute(&self, vars: &dyn VariableSource) -> String {
        let mut out = String::with_capacity(self.source.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(p) => match vars.lookup(&p.name) {
                    Some(value) => match p.slice {
                        Some(slice) => out.push_str(&slice.apply(&value)),
                        None => out.push_str(&value),
                    },
                    None => out.push_str(&p.source),
                },
            }
        }
        out
    }
}

impl FromStr for SlicedTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SlicedTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
