//! Tokenizer for phrase templates.
//!
//! Two placeholder forms are recognised:
//!
//! - `${name}` substitutes a data value.
//! - `$map{name:attrs:delimiter}` projects a list value: for every element the
//!   comma-separated `attrs` are looked up and the elements are joined with
//!   `delimiter`. The delimiter is everything after the second `:` and may be
//!   empty; it cannot contain `}` except as the end of a nested `${name}`.
//!
//! Anything else, including unterminated placeholders, is literal text.

const PLACEHOLDER_OPEN: &str = "${";
const MAP_OPEN: &str = "$map{";
const CLOSE: char = '}';

/// A parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Placeholder { name: &'a str, raw: &'a str },
    Map(MapProjection<'a>),
}

impl<'a> Segment<'a> {
    /// The source text this segment was parsed from.
    pub fn raw(&self) -> &'a str {
        match self {
            Segment::Text(text) => text,
            Segment::Placeholder { raw, .. } => raw,
            Segment::Map(projection) => projection.raw,
        }
    }
}

/// A `$map{key:attrs:delimiter}` projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapProjection<'a> {
    pub key: &'a str,
    pub attrs: Vec<&'a str>,
    pub delimiter: &'a str,
    pub raw: &'a str,
}

impl<'a> MapProjection<'a> {
    fn parse(body: &'a str, raw: &'a str) -> Option<Self> {
        let (key, rest) = body.split_once(':')?;
        let (attrs, delimiter) = rest.split_once(':').unwrap_or((rest, ""));
        Some(Self {
            key,
            attrs: attrs.split(',').collect(),
            delimiter,
            raw,
        })
    }
}

/// Split a template into text and placeholder segments, left to right.
pub fn parse(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find('$') {
        let start = cursor + offset;
        let rest = &template[start..];

        let token = if let Some(body_and_tail) = rest.strip_prefix(MAP_OPEN) {
            map_body_end(body_and_tail).and_then(|end| {
                let raw = &rest[..MAP_OPEN.len() + end + 1];
                MapProjection::parse(&body_and_tail[..end], raw).map(Segment::Map)
            })
        } else if let Some(body_and_tail) = rest.strip_prefix(PLACEHOLDER_OPEN) {
            body_and_tail.find(CLOSE).map(|end| Segment::Placeholder {
                name: &body_and_tail[..end],
                raw: &rest[..PLACEHOLDER_OPEN.len() + end + 1],
            })
        } else {
            None
        };

        match token {
            Some(segment) => {
                if text_start < start {
                    segments.push(Segment::Text(&template[text_start..start]));
                }
                cursor = start + segment.raw().len();
                text_start = cursor;
                segments.push(segment);
            }
            None => cursor = start + 1,
        }
    }

    if text_start < template.len() {
        segments.push(Segment::Text(&template[text_start..]));
    }
    segments
}

/// Offset of the `}` closing a `$map{` body, skipping `${name}` placeholders
/// nested inside it.
fn map_body_end(body_and_tail: &str) -> Option<usize> {
    let mut cursor = 0;
    loop {
        let end = cursor + body_and_tail[cursor..].find(CLOSE)?;
        if !body_and_tail[cursor..end].contains(PLACEHOLDER_OPEN) {
            return Some(end);
        }
        cursor = end + 1;
    }
}

/// Names referenced by the placeholders of a template, in order of first use.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    collect_placeholders(template, &mut names);
    names
}

fn collect_placeholders<'a>(template: &'a str, names: &mut Vec<&'a str>) {
    for segment in parse(template) {
        let name = match segment {
            Segment::Placeholder { name, .. } => name,
            Segment::Map(projection) => {
                if !names.contains(&projection.key) {
                    names.push(projection.key);
                }
                collect_placeholders(projection.delimiter, names);
                continue;
            }
            Segment::Text(_) => continue,
        };
        if !names.contains(&name) {
            names.push(name);
        }
    }
}
