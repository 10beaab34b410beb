//! SSML markup helpers.

/// Escape text for use as SSML element content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// `<audio src="..."/>` referencing external audio.
pub fn audio_tag(src: &str) -> String {
    format!(r#"<audio src="{}"/>"#, escape_attribute(src))
}

/// Plain text voiced by the platform's own speech engine.
pub fn speak(text: &str) -> String {
    format!("<speak>{}</speak>", escape_text(text))
}

/// Wrap markup in exactly one outer `<speak>` element.
///
/// An existing outer speak element is stripped first, so both bare audio
/// tags and already-wrapped text produce valid SSML.
pub fn wrap_speak(markup: &str) -> String {
    let inner = markup.trim();
    let inner = inner
        .strip_prefix("<speak>")
        .and_then(|s| s.strip_suffix("</speak>"))
        .unwrap_or(inner);
    format!("<speak>{}</speak>", inner)
}

/// First `max_chars` characters of `text`, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
