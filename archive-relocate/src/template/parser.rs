//! Template mini-parser.
//!
//! Grammar:
//!
//! ```text
//! template    := (literal | escape | placeholder)*
//! escape      := "$$"
//! placeholder := "$" ident slice? | "${" ident slice? "}" slice?
//! ident       := [A-Za-z_][A-Za-z0-9_]*
//! slice       := "[" bound? ":" bound? "]"
//! bound       := "-"? [0-9]+
//! ```
//!
//! A `$` that starts none of the above is kept as literal text. A slice
//! suffix that does not parse is left as literal text after the placeholder.

use super::slice::Slice;
use thiserror::Error;

/// Errors detected while parsing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// `${` with no closing brace
    #[error("unterminated '${{' at byte {position}")]
    UnterminatedBrace { position: usize },

    /// Braced placeholder whose content is not `ident` or `ident[slice]`
    #[error("invalid placeholder '{text}' at byte {position}")]
    InvalidPlaceholder { position: usize, text: String },
}

/// A `$name` reference inside a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub slice: Option<Slice>,
    /// Exact source text, re-emitted when the name cannot be resolved.
    pub source: String,
}

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

pub(super) fn parse(template: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while pos < template.len() {
        let rest = &template[pos..];
        let Some(dollar) = rest.find('$') else {
            literal.push_str(rest);
            break;
        };
        literal.push_str(&rest[..dollar]);
        pos += dollar;

        let after = &template[pos + 1..];
        if after.starts_with('$') {
            literal.push('$');
            pos += 2;
        } else if after.starts_with('{') {
            let (placeholder, consumed) = parse_braced(template, pos)?;
            flush(&mut segments, &mut literal);
            segments.push(Segment::Placeholder(placeholder));
            pos += consumed;
        } else if let Some(len) = ident_len(after) {
            let name = &after[..len];
            let (slice, slice_len) = match Slice::parse_prefix(&after[len..]) {
                Some((slice, n)) => (Some(slice), n),
                None => (None, 0),
            };
            let consumed = 1 + len + slice_len;
            flush(&mut segments, &mut literal);
            segments.push(Segment::Placeholder(Placeholder {
                name: name.to_string(),
                slice,
                source: template[pos..pos + consumed].to_string(),
            }));
            pos += consumed;
        } else {
            literal.push('$');
            pos += 1;
        }
    }

    flush(&mut segments, &mut literal);
    Ok(segments)
}

/// Parse `${...}` starting at the `$` located at `start`.
fn parse_braced(template: &str, start: usize) -> Result<(Placeholder, usize), TemplateError> {
    let body_start = start + 2;
    let close = template[body_start..]
        .find('}')
        .ok_or(TemplateError::UnterminatedBrace { position: start })?;
    let body = &template[body_start..body_start + close];
    let invalid = || TemplateError::InvalidPlaceholder {
        position: start,
        text: template[start..body_start + close + 1].to_string(),
    };

    let len = ident_len(body).ok_or_else(invalid)?;
    let inner_slice = match &body[len..] {
        "" => None,
        tail => match Slice::parse_prefix(tail) {
            Some((slice, n)) if n == tail.len() => Some(slice),
            _ => return Err(invalid()),
        },
    };

    let mut consumed = close + 3;
    let slice = match inner_slice {
        Some(slice) => Some(slice),
        None => match Slice::parse_prefix(&template[start + consumed..]) {
            Some((slice, n)) => {
                consumed += n;
                Some(slice)
            }
            None => None,
        },
    };

    Ok((
        Placeholder {
            name: body[..len].to_string(),
            slice,
            source: template[start..start + consumed].to_string(),
        },
        consumed,
    ))
}

/// Byte length of the identifier at the start of `input`, if any.
fn ident_len(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return None,
    }
    Some(
        bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count(),
    )
}

fn flush(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(name: &str, slice: Option<Slice>, source: &str) -> Segment {
        Segment::Placeholder(Placeholder {
            name: name.to_string(),
            slice,
            source: source.to_string(),
        })
    }

    fn literal(text: &str) -> Segment {
        Segment::Literal(text.to_string())
    }

    #[test]
    fn test_parse_plain_and_sliced_placeholders() {
        let segments = parse("$cluster_id[:2]/$cluster_id/$year$month").unwrap();
        assert_eq!(
            segments,
            vec![
                placeholder("cluster_id", Some(Slice::new(None, Some(2))), "$cluster_id[:2]"),
                literal("/"),
                placeholder("cluster_id", None, "$cluster_id"),
                literal("/"),
                placeholder("year", None, "$year"),
                placeholder("month", None, "$month"),
            ]
        );
    }

    #[test]
    fn test_parse_braced_forms() {
        assert_eq!(
            parse("${day}x").unwrap(),
            vec![placeholder("day", None, "${day}"), literal("x")]
        );
        assert_eq!(
            parse("${id[1:]}").unwrap(),
            vec![placeholder("id", Some(Slice::new(Some(1), None)), "${id[1:]}")]
        );
        assert_eq!(
            parse("${id}[-2:]").unwrap(),
            vec![placeholder("id", Some(Slice::new(Some(-2), None)), "${id}[-2:]")]
        );
    }

    #[test]
    fn test_parse_escapes_and_stray_dollars() {
        assert_eq!(parse("cost: $$5").unwrap(), vec![literal("cost: $5")]);
        assert_eq!(parse("a $ b").unwrap(), vec![literal("a $ b")]);
        assert_eq!(parse("end$").unwrap(), vec![literal("end$")]);
        assert_eq!(parse("$1").unwrap(), vec![literal("$1")]);
    }

    #[test]
    fn test_parse_unparseable_slice_stays_literal() {
        assert_eq!(
            parse("$time[x:2].tar").unwrap(),
            vec![placeholder("time", None, "$time"), literal("[x:2].tar")]
        );
    }

    #[test]
    fn test_parse_non_ascii_literals() {
        assert_eq!(
            parse("año/$day/ü").unwrap(),
            vec![literal("año/"), placeholder("day", None, "$day"), literal("/ü")]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse("a/${cluster_id"),
            Err(TemplateError::UnterminatedBrace { position: 2 })
        );
        assert_eq!(
            parse("${}"),
            Err(TemplateError::InvalidPlaceholder {
                position: 0,
                text: "${}".to_string()
            })
        );
        assert!(matches!(
            parse("${9lives}"),
            Err(TemplateError::InvalidPlaceholder { .. })
        ));
        assert!(matches!(
            parse("${id[a:b]}"),
            Err(TemplateError::InvalidPlaceholder { .. })
        ));
    }

    #[test]
    fn test_parse_empty_template() {
        assert!(parse("").unwrap().is_empty());
    }
}
