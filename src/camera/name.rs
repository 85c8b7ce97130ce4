//! Human-readable camera names derived from raw device labels.

/// Derive a display name from a raw device label.
///
/// Platforms often append a vendor/product annotation such as `(04f2:b5d8)`
/// to the label. That suffix is stripped. If nothing is left the raw label is
/// used as-is, and an empty label (no access granted yet) yields `None`.
pub fn camera_name(label: &str) -> Option<String> {
    let clean = strip_hex_suffix(label);
    if !clean.is_empty() {
        Some(clean.to_string())
    } else if !label.is_empty() {
        Some(label.to_string())
    } else {
        None
    }
}

/// Remove a trailing `(hex)` or `(hex:hex)` group plus the whitespace around it.
fn strip_hex_suffix(label: &str) -> &str {
    let trimmed = label.trim_end();
    let Some(body) = trimmed.strip_suffix(')') else {
        return label;
    };
    let Some(open) = body.rfind('(') else {
        return label;
    };

    let inner = &body[open + 1..];
    let valid = match inner.split_once(':') {
        Some((vendor, product)) => is_lower_hex(vendor) && is_lower_hex(product),
        None => is_lower_hex(inner),
    };

    if valid {
        body[..open].trim_end()
    } else {
        label
    }
}

fn is_lower_hex(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
}
