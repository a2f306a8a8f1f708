//! Display titles derived from content file names.

/// Characters in a file stem that separate words.
const SEPARATORS: &[char] = &['-', '_'];

/// Turn a file stem into a display title.
///
/// Separators become spaces and the first letter of every
/// whitespace-delimited word is uppercased. All other characters, including
/// the remaining casing and runs of spaces, are kept as they are.
///
/// ```ignore
/// assert_eq!(title_from_stem("tomato-meat-machillo-receipe"), "Tomato Meat Machillo Receipe");
/// ```
pub fn title_from_stem(stem: &str) -> String {
    let mut title = String::with_capacity(stem.len());
    let mut at_word_start = true;

    for c in stem.chars() {
        let c = if SEPARATORS.contains(&c) { ' ' } else { c };
        if c.is_whitespace() {
            at_word_start = true;
            title.push(c);
        } else if at_word_start {
            at_word_start = false;
            title.extend(c.to_uppercase());
        } else {
            title.push(c);
        }
    }

    title
}

/// Strip `.{extension}` from a file name, if it carries it.
pub fn strip_extension<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    file_name
        .strip_suffix(extension)?
        .strip_suffix('.')
        .filter(|stem| !stem.is_empty())
}
