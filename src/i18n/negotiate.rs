//! Accept-Language negotiation against the loaded languages.
//!
//! Picks the best supported language for a request the way HTTP content
//! negotiation does: entries are ranked by their `q` weight, and a requested
//! tag matches a supported language exactly or through its primary subtag
//! (`en-GB` matches `en`, and `en` matches `en-GB`).

/// A single `Accept-Language` entry.
#[derive(Debug, Clone, PartialEq)]
struct Preference<'a> {
    tag: &'a str,
    quality: f32,
}

/// Choose the language for a request.
///
/// # Arguments
/// * `accept_language` - The raw `Accept-Language` header, if any
/// * `supported` - The languages available in the phrase store
///
/// # Returns
/// * The first supported language when no header was sent
/// * The best match otherwise, or `None` if nothing acceptable is supported
pub fn negotiate(accept_language: Option<&str>, supported: &[&str]) -> Option<String> {
    let Some(header) = accept_language else {
        return supported.first().map(|lang| lang.to_string());
    };

    let mut preferences = parse_accept_language(header);
    // Stable sort keeps header order between equal weights
    preferences.sort_by(|a, b| b.quality.total_cmp(&a.quality));

    preferences
        .iter()
        .find_map(|pref| best_match(pref.tag, supported))
        .map(str::to_string)
}

fn parse_accept_language(value: &str) -> Vec<Preference<'_>> {
    value
        .split(',')
        .filter_map(|part| {
            let mut components = part.trim().split(';');
            let tag = components.next()?.trim();
            if tag.is_empty() {
                return None;
            }
            let quality = components
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (quality > 0.0).then_some(Preference { tag, quality })
        })
        .collect()
}

fn best_match<'s>(tag: &str, supported: &[&'s str]) -> Option<&'s str> {
    if tag == "*" {
        return supported.first().copied();
    }
    if let Some(exact) = supported
        .iter()
        .copied()
        .find(|lang| lang.eq_ignore_ascii_case(tag))
    {
        return Some(exact);
    }
    let requested_primary = primary_subtag(tag);
    supported.iter().copied().find(|lang| {
        requested_primary.eq_ignore_ascii_case(lang) || primary_subtag(lang).eq_ignore_ascii_case(tag)
    })
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}
