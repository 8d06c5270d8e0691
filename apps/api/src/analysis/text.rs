//! Text helpers shared by the extractor, scorer and PDF ingestion.

/// Upper bound on the number of characters any analysis step will look at.
pub const MAX_TEXT_CHARS: usize = 1_000_000;

/// Returns at most `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Normalizes text pulled out of a PDF.
///
/// Replaces NUL and carriage returns, drops characters outside the set
/// `[\w\s.,\-()#+/@%$&:;•]`, collapses whitespace and applies `MAX_TEXT_CHARS`.
/// Newlines are kept so that line-start bullets survive for formatting checks.
pub fn clean_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len().min(MAX_TEXT_CHARS));

    for line in text.split('\n') {
        let mut line_buf = String::new();
        for ch in line.chars() {
            let ch = match ch {
                '\0' | '\r' | '\t' => ' ',
                c if c.is_alphanumeric() || c == '_' || c == ' ' => c,
                '.' | ',' | '-' | '(' | ')' | '#' | '+' | '/' | '@' | '%' | '$' | '&' | ':'
                | ';' | '•' | '●' | '▪' | '■' | '€' | '£' => ch,
                c if c.is_whitespace() => ' ',
                _ => ' ',
            };
            line_buf.push(ch);
        }

        let collapsed = line_buf.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            continue;
        }
        if !cleaned.is_empty() {
            cleaned.push('\n');
        }
        cleaned.push_str(&collapsed);
    }

    truncate_chars(&cleaned, MAX_TEXT_CHARS).to_string()
}

/// Counts whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
