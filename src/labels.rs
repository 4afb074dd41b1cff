//! Class-index to glyph lookup.

/// Returned for class indices past the end of the table.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Glyphs in the class-index order the models were trained with.
pub const LABELS: [&str; 60] = [
    // vowels
    "অ", "আ", "ই", "ঈ", "উ", "ঊ", "ঋ", "এ",
    "ঐ", "ও", "ঔ",
    // consonants
    "ক", "খ", "গ", "ঘ", "ঙ", "চ", "ছ", "জ",
    "ঝ", "ঞ", "ট", "ঠ", "ড", "ঢ", "ণ", "ত",
    "থ", "দ", "ধ", "ন", "প", "ফ", "ব", "ভ",
    "ম", "য", "র", "ল", "শ", "ষ", "স", "হ",
    // additional marks
    "ড\u{9bc}", "ঢ\u{9bc}", "য\u{9bc}", "ৎ", "ং", "ঃ", "ঁ",
    // digits
    "০", "১", "২", "৩", "৪", "৫", "৬", "৭",
    "৮", "৯",
];

/// Resolves a predicted class index to its glyph.
pub fn label(index: usize) -> &'static str {
    LABELS.get(index).copied().unwrap_or(UNKNOWN_LABEL)
}
