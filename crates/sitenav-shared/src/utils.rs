//! Utility functions

/// Escapes text for use inside HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// True for names usable as bare HTML tag names (`ul`, `li`, `div`, `h2`).
pub fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Tom & \"Jerry\" <b>"), "Tom &amp; &quot;Jerry&quot; &lt;b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_tag_names() {
        assert!(is_valid_tag_name("ul"));
        assert!(is_valid_tag_name("h2"));
        assert!(!is_valid_tag_name("2h"));
        assert!(!is_valid_tag_name("div onclick"));
        assert!(!is_valid_tag_name(""));
    }
}
