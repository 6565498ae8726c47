// ── Identity helpers ──
//
// Slugs key groups in the store; normalized MACs key members inside a
// static group. Both are pure reshaping functions with no validation.

/// Derive the storage key for a group display name.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen, and strips leading/trailing hyphens:
/// `"Kids Devices"` becomes `"kids-devices"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Normalize a MAC address to uppercase, colon-separated form.
///
/// Accepts colon-, dash-, or dot-separated input and bare 12-character hex.
/// Hex digits are not validated; malformed input passes through reshaped.
pub fn normalize_mac(raw: &str) -> String {
    let mac = raw.to_uppercase().replace(['-', '.'], ":");
    if mac.contains(':') || mac.chars().count() != 12 {
        return mac;
    }

    let chars: Vec<char> = mac.chars().collect();
    chars
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
}

/// Uppercase and unify separators without inserting colons.
///
/// Used for MAC prefix rules, where a partial address like `"aa-bb"` must
/// still compare against `"AA:BB:CC:DD:EE:FF"`.
pub(crate) fn normalize_mac_separators(raw: &str) -> String {
    raw.to_uppercase().replace(['-', '.'], ":")
}
