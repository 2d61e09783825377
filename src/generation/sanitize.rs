//! Prompt validation and sanitization

use std::sync::LazyLock;

use regex::Regex;

use super::GenerationError;

static INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|EXEC|EXECUTE|UNION|SCRIPT)\b",
        r"(?i)\b(OR|AND)\s+\d+\s*=\s*\d+",
        r#"('|"|;|--|/\*|\*/)"#,
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("injection pattern must compile"))
    .collect()
});

/// Reject empty, overlong, or injection-looking prompts
pub fn validate_prompt(prompt: &str, max_length: usize) -> Result<(), GenerationError> {
    if prompt.trim().is_empty() {
        return Err(GenerationError::InvalidPrompt(
            "الرجاء إدخال نص الوصف".to_string(),
        ));
    }

    if prompt.chars().count() > max_length {
        return Err(GenerationError::InvalidPrompt(format!(
            "النص طويل جداً (الحد الأقصى {max_length} حرف)"
        )));
    }

    if INJECTION_PATTERNS.iter().any(|re| re.is_match(prompt)) {
        return Err(GenerationError::InvalidPrompt(
            "النص المدخل غير صالح".to_string(),
        ));
    }

    Ok(())
}

/// Drop NUL bytes, truncate, strip quote/angle characters and HTML-escape
#[must_use]
pub fn sanitize_input(text: &str, max_length: usize) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| *c != '\0')
        .take(max_length)
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect();

    escape_html(&stripped).trim().to_string()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
