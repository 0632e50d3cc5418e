//! Canonical lookup keys for operator-entered names.
//!
//! Club, cordage and status names are typed by hand in the shop, so the
//! same product shows up as `"BG 80"`, `"bg80"` or `"Bg-80"`. Lookups go
//! through these helpers instead of comparing raw strings.

/// Fold the accented letters used in French labels to their ASCII base.
fn fold_accent(c: char) -> char {
    match c {
        'à' | 'â' | 'ä' | 'á' => 'a',
        'À' | 'Â' | 'Ä' | 'Á' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'î' | 'ï' | 'í' => 'i',
        'Î' | 'Ï' | 'Í' => 'I',
        'ô' | 'ö' | 'ó' => 'o',
        'Ô' | 'Ö' | 'Ó' => 'O',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'Ù' | 'Û' | 'Ü' | 'Ú' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ÿ' => 'y',
        other => other,
    }
}

/// Uppercase, accent-folded and trimmed form of a label.
///
/// Inner spaces are kept, so `"Message envoyé"` becomes `"MESSAGE ENVOYE"`.
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(fold_accent)
        .collect::<String>()
        .to_uppercase()
}

/// Canonical key: [`normalize_label`] with every non-alphanumeric removed.
///
/// ```
/// use stringdesk_core::keys::canonical_key;
///
/// assert_eq!(canonical_key("BG 80 Power"), "BG80POWER");
/// assert_eq!(canonical_key("Fabrègues"), "FABREGUES");
/// ```
pub fn canonical_key(raw: &str) -> String {
    normalize_label(raw)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
