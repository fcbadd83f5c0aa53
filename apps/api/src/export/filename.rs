/// `{display name}_{template name}_Resume.pdf`, with characters that are
/// unsafe in file names replaced by `_`.
pub fn export_file_name(display_name: &str, template_name: &str) -> String {
    let name = display_name.trim();
    let name = if name.is_empty() { "Resume" } else { name };
    format!(
        "{}_{}_Resume.pdf",
        sanitize(name),
        sanitize(template_name.trim())
    )
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// `Content-Disposition` value carrying an ASCII fallback and the exact
/// UTF-8 name.
pub fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
        percent_encode(file_name)
    )
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
