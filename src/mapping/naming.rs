//! Field name to setter name convention.

/// `first_name` -> `setFirstName`, `age` -> `setAge`, `homeTown` -> `setHomeTown`.
///
/// Underscores, dashes and spaces separate words; each word's first character
/// is upper-cased and the rest is kept as written.
pub fn setter_name(field: &str) -> String {
    let mut setter = String::with_capacity(field.len() + 3);
    setter.push_str("set");
    for word in field.split(['_', '-', ' ']).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            setter.extend(first.to_uppercase());
            setter.push_str(chars.as_str());
        }
    }
    setter
}
