
/// Decodes one pipe-separated option field into an ordered list of trimmed
/// option strings. A backslash escapes the delimiter (`a\|b` is the single
/// option `a|b`) and itself (`a\\` ends in one literal backslash); before any
/// other character it is kept literally.
pub fn split_options(raw: &str) -> Vec<String> {
    let mut options = Vec::new();
    let mut accumulator = String::new();
    let mut escaped = false;

    for character in raw.chars() {
        if escaped {
            match character {
                '|' | '\\' => accumulator.push(character),
                other => {
                    // The escape only suppresses delimiter splitting
                    accumulator.push('\\');
                    accumulator.push(other);
                }
            }
            escaped = false;
        } else {
            match character {
                '\\' => escaped = true,
                '|' => {
                    options.push(accumulator.trim().to_owned());
                    accumulator.clear();
                }
                other => accumulator.push(other),
            }
        }
    }

    if escaped {
        // Trailing unterminated escape is kept as a literal backslash
        accumulator.push('\\');
    }
    let trailing = accumulator.trim();
    if !trailing.is_empty() {
        options.push(trailing.to_owned());
    }

    options
}
