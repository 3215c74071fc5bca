use miette::SourceSpan;

/// Converts a 1-based line and column, as reported by the JSON and YAML
/// deserializers, into a byte offset into `source`.
/// Positions past the end clamp to the end of the text.
pub fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut current_column = 1;
    for (i, c) in source.char_indices() {
        if current_line == line && current_column == column {
            return i;
        }
        if c == '\n' {
            if current_line == line {
                return i;
            }
            current_line += 1;
            current_column = 1;
        } else {
            current_column += 1;
        }
    }
    source.len()
}

/// A one-character span at the given position, or an empty span at the end
/// of the text.
pub fn span_at(source: &str, line: usize, column: usize) -> SourceSpan {
    let offset = offset_of(source, line, column);
    let len = usize::from(offset < source.len());
    (offset, len).into()
}

/// Canonical spelling of a C++ type for signature comparison:
/// `const  QString &` and `const QString&` compare equal.
pub fn normalize_type_name(type_name: &str) -> String {
    let collapsed = type_name.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut normalized = String::with_capacity(collapsed.len());
    let chars: Vec<char> = collapsed.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if *c == ' ' {
            let before = i.checked_sub(1).map(|j| chars[j]);
            let after = chars.get(i + 1).copied();
            let tight = |ch: Option<char>| matches!(ch, Some('*' | '&' | '<' | '>' | ',' | '(' | ')'));
            if (tight(before) && before != Some(',')) || tight(after) {
                continue;
            }
        }
        normalized.push(*c);
    }
    normalized
}
