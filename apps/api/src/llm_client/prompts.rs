// Cross-cutting prompt fragments. Each module that calls the LLM keeps its own
// prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Joins a role description with the JSON-only rules.
pub fn json_system(role: &str) -> String {
    format!("{role} {JSON_ONLY_SYSTEM}")
}

/// Substitutes `{key}` placeholders in one pass, so inserted values are never
/// themselves scanned for placeholders. Unknown braces are left as they are.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = values.iter().find_map(|(key, value)| {
            tail.strip_prefix('{')
                .and_then(|t| t.strip_prefix(key))
                .and_then(|t| t.strip_prefix('}'))
                .map(|after| (value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_known_keys() {
        let out = fill("Q: {query} C: {context}", &[("query", "hi"), ("context", "none")]);
        assert_eq!(out, "Q: hi C: none");
    }

    #[test]
    fn test_fill_does_not_rescan_values() {
        let out = fill("{a} {b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(out, "{b} x");
    }

    #[test]
    fn test_fill_keeps_unrelated_braces() {
        let out = fill(r#"{"matchScore": 0} {k}"#, &[("k", "v")]);
        assert_eq!(out, r#"{"matchScore": 0} v"#);
    }

    #[test]
    fn test_json_system_appends_rules() {
        assert!(json_system("Role.").starts_with("Role. You MUST respond with valid JSON"));
    }
}
