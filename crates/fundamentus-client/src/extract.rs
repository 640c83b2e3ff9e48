use lazy_static::lazy_static;
use regex::Regex;
use valuation_core::{Field, FieldSet, ScrapeError};

/// Phrase the details page prints when the ticker is unknown.
pub const NOT_FOUND_MARKER: &str = "Nenhum papel encontrado";

lazy_static! {
    // Shortest inner text up to the next closing span, markup included.
    static ref TXT_SPAN: Regex =
        Regex::new(r#"(?s)<span\sclass="txt"[^>]*>(.*?)</span>"#).expect("valid span pattern");
}

/// Inner text of every `<span class="txt">` in document order.
pub fn txt_spans(page: &str) -> Vec<&str> {
    TXT_SPAN
        .captures_iter(page)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Pull the known fundamentals out of a details page.
///
/// Spans are read as label/value pairs: a recognised label always takes the
/// span right after it as its value, and that value span is never looked up
/// as a label. A recognised label in last position reads an empty value, so
/// its field is present as `0.0`. A label seen twice keeps its last value.
pub fn extract_fields(page: &str) -> Result<FieldSet, ScrapeError> {
    if page.contains(NOT_FOUND_MARKER) {
        return Err(ScrapeError::NotFound);
    }

    let spans = txt_spans(page);
    let mut fields = FieldSet::default();

    let mut index = 0;
    while index < spans.len() {
        match Field::from_label(spans[index]) {
            Some(field) => {
                let raw = spans.get(index + 1).copied().unwrap_or_default();
                let value = coerce_number(raw);
                tracing::trace!(%field, raw = %raw, value, "field extracted");
                fields.set(field, value);
                index += 2;
            }
            None => index += 1,
        }
    }

    tracing::debug!(
        spans = spans.len(),
        fields = fields.present_count(),
        "details page parsed"
    );

    Ok(fields)
}

/// Permissive numeric coercion for Brazilian-formatted values.
///
/// Whitespace and `%` are dropped and `,` becomes `.`; the longest leading
/// decimal number is then parsed. Text with no numeric prefix yields `0.0`.
/// Thousands separators are not understood: `1.234,56` reads as `1.234`.
pub fn coerce_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '%')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    numeric_prefix(&cleaned).parse::<f64>().unwrap_or(0.0)
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    &s[..end]
}
