use sha2::{Digest, Sha256};

const MAX_STEM_LEN: usize = 80;

/// Filesystem-safe, deterministic export name: `{sanitized_company}--{short_hash(seed)}.html`.
///
/// `seed` should identify the submission (e.g. every form value joined); the
/// same company and seed always map to the same file.
pub fn result_filename(company_name: Option<&str>, seed: &str) -> String {
    let stem = sanitize_stem(company_name.unwrap_or("meeting"));
    let hash = short_hash(seed);
    format!("{stem}--{hash}.html")
}

fn sanitize_stem(input: &str) -> String {
    let mut compacted = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let c = if is_forbidden(c) || c.is_whitespace() { '_' } else { c };
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    let mut stem = compacted.trim_matches(&['_', '.'][..]).to_string();
    if stem.is_empty() {
        stem = "meeting".to_string();
    }
    if stem.len() > MAX_STEM_LEN {
        let mut end = MAX_STEM_LEN;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem.truncate(end);
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    Sha256::digest(input.as_bytes())
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
