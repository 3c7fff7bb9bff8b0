//! Field-level parsers and the listing-shape heuristics shared by the
//! structured strategies.

use common::{RawCandidate, SourceId};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

lazy_static! {
    static ref DIGIT_RUN_RE: Regex = Regex::new(r"\d+").expect("static regex");
    static ref YEAR_RE: Regex = Regex::new(r"\b(19|20)\d{2}\b").expect("static regex");
    static ref MILEAGE_RE: Regex =
        Regex::new(r"(?i)([\d,]+)\s*(?:miles|mi)\b").expect("static regex");
}

/// Parse an asking price out of arbitrary price text.
///
/// Strips currency symbols and thousands separators, then takes the
/// first contiguous digit run. Unparseable text yields 0, which the
/// normalizer treats as "reject" — never as "free".
pub fn parse_price(text: &str) -> i64 {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '£' | '$' | '€' | ','))
        .collect();
    DIGIT_RUN_RE
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}

/// First plausible 4-digit model year (19xx/20xx) in the text.
pub fn parse_year(text: &str) -> Option<i32> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// First "NNN miles" figure in the text, digits and separators only.
pub fn find_mileage(text: &str) -> Option<String> {
    MILEAGE_RE
        .captures(text)
        .map(|c| c[1].to_string())
}

// ── JSON payload walking ──────────────────────────────────────────────

// Key names under which marketplaces have been observed to ship each
// field. Matched case-insensitively.
const TITLE_KEYS: &[&str] = &["title", "name", "heading", "adtitle", "displaytitle"];
const PRICE_KEYS: &[&str] = &["price", "pricetext", "displayprice", "advertisedprice", "amount"];
const LOCATION_KEYS: &[&str] = &["location", "town", "area", "displaylocation", "sellerlocation"];
const URL_KEYS: &[&str] = &["url", "href", "link", "detailurl", "adurl"];
const IMAGE_KEYS: &[&str] = &["image", "imageurl", "img", "thumbnail"];
const YEAR_KEYS: &[&str] = &["year", "registrationyear", "regyear"];
const MILEAGE_KEYS: &[&str] = &["mileage", "miles", "odometer"];

// Sub-keys tried when a field maps to a nested object (e.g.
// `"price": {"amount": 4995, "currency": "GBP"}`).
const NESTED_VALUE_KEYS: &[&str] = &["amount", "value", "text", "display"];

/// Fetch a field as a string under any of `names` (case-insensitive),
/// descending one level into nested objects.
fn field(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    for (key, value) in obj {
        let lowered = key.to_lowercase();
        if !names.contains(&lowered.as_str()) {
            continue;
        }
        match value {
            Value::String(s) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Value::Number(n) => return Some(n.to_string()),
            Value::Object(inner) => {
                if let Some(v) = field(inner, NESTED_VALUE_KEYS) {
                    return Some(v);
                }
            }
            _ => {}
        }
    }
    None
}

/// Whether a JSON object carries enough listing-shaped fields to be a
/// candidate: something price-like plus a title or a detail link.
fn looks_like_listing(obj: &Map<String, Value>) -> bool {
    field(obj, PRICE_KEYS).is_some()
        && (field(obj, TITLE_KEYS).is_some() || field(obj, URL_KEYS).is_some())
}

/// Convert a listing-shaped object into a candidate.
fn candidate_from(obj: &Map<String, Value>, source: SourceId) -> RawCandidate {
    let mut candidate = RawCandidate::empty(source);
    candidate.title = field(obj, TITLE_KEYS).unwrap_or_default();
    candidate.price_text = field(obj, PRICE_KEYS).unwrap_or_default();
    candidate.location = field(obj, LOCATION_KEYS).unwrap_or_default();
    candidate.year_text = field(obj, YEAR_KEYS).unwrap_or_default();
    candidate.mileage_text = field(obj, MILEAGE_KEYS).unwrap_or_default();
    candidate.url = field(obj, URL_KEYS).unwrap_or_default();
    candidate.image_url = field(obj, IMAGE_KEYS);
    candidate
}

/// Walk an arbitrary JSON value for list-like substructures of
/// listing-shaped objects and append a candidate per shaped element.
///
/// Elements that are not listing-shaped are skipped without aborting
/// the batch; non-shaped branches are recursed into so the walk finds
/// lists nested anywhere in an application-state tree.
pub fn collect_candidates(value: &Value, source: SourceId, out: &mut Vec<RawCandidate>) {
    match value {
        Value::Array(items) => {
            let any_shaped = items
                .iter()
                .any(|item| item.as_object().is_some_and(looks_like_listing));
            for item in items {
                match item.as_object() {
                    Some(obj) if looks_like_listing(obj) => out.push(candidate_from(obj, source)),
                    // Garbled element in an otherwise shaped list:
                    // skip it, keep the rest.
                    _ if any_shaped => {}
                    _ => collect_candidates(item, source, out),
                }
            }
        }
        Value::Object(obj) => {
            for child in obj.values() {
                collect_candidates(child, source, out);
            }
        }
        _ => {}
    }
}

/// Slice a balanced JSON object/array literal starting at `start`
/// (which must point at `{` or `[`), respecting strings and escapes.
pub fn balanced_json_slice(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let open = *bytes.get(start)?;
    if open != b'{' && open != b'[' {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_price_currency_and_separators() {
        assert_eq!(parse_price("£12,500"), 12500);
        assert_eq!(parse_price("£4995 ono"), 4995);
        assert_eq!(parse_price("from £1,250.99"), 1250);
    }

    #[test]
    fn test_parse_price_unparseable_is_zero() {
        assert_eq!(parse_price(""), 0);
        assert_eq!(parse_price("POA"), 0);
        assert_eq!(parse_price("contact seller"), 0);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1997 BMW E36 M3"), Some(1997));
        assert_eq!(parse_year("Reg 2004, 89k miles"), Some(2004));
        assert_eq!(parse_year("no year here"), None);
        // 5-digit runs are not years.
        assert_eq!(parse_year("ref 201456"), None);
    }

    #[test]
    fn test_find_mileage() {
        assert_eq!(find_mileage("89,000 miles, FSH").as_deref(), Some("89,000"));
        assert_eq!(find_mileage("112000 mi").as_deref(), Some("112000"));
        assert_eq!(find_mileage("low mileage").as_deref(), None);
    }

    #[test]
    fn test_collect_candidates_from_shaped_list() {
        let payload = json!({
            "search": {
                "results": [
                    {"title": "BMW 330Ci Sport", "price": "£6,495", "location": "Chester", "url": "/ad/1"},
                    {"title": "BMW 330i SE", "price": {"amount": 5250}, "town": "Leeds", "href": "/ad/2"}
                ]
            }
        });
        let mut out = Vec::new();
        collect_candidates(&payload, SourceId::AutoTrader, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "BMW 330Ci Sport");
        assert_eq!(parse_price(&out[1].price_text), 5250);
        assert_eq!(out[1].location, "Leeds");
        assert_eq!(out[1].url, "/ad/2");
    }

    #[test]
    fn test_collect_candidates_skips_garbled_element() {
        let payload = json!([
            {"title": "Lexus IS200 Sport", "price": "£2,995", "url": "/ad/1"},
            42,
            {"unrelated": true},
            {"title": "Lexus IS300", "price": "£3,750", "url": "/ad/2"}
        ]);
        let mut out = Vec::new();
        collect_candidates(&payload, SourceId::Gumtree, &mut out);
        assert_eq!(out.len(), 2, "garbled elements must not abort the batch");
    }

    #[test]
    fn test_collect_candidates_nothing_shaped() {
        let payload = json!({"nav": ["home", "cars"], "counts": [1, 2, 3]});
        let mut out = Vec::new();
        collect_candidates(&payload, SourceId::AutoTrader, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_balanced_json_slice() {
        let text = r#"prefix {"a": {"b": "va}ue"}, "c": [1, 2]} suffix"#;
        let start = text.find('{').unwrap();
        let slice = balanced_json_slice(text, start).unwrap();
        assert!(serde_json::from_str::<Value>(slice).is_ok());
        assert!(slice.ends_with("]}"));
    }

    #[test]
    fn test_balanced_json_slice_unterminated() {
        let text = r#"{"a": [1, 2"#;
        assert!(balanced_json_slice(text, 0).is_none());
    }
}
