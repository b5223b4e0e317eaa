//! JSDoc content parsing: summary text and block tags.

/// One block tag (`@param x the value`). `text` is everything after the tag
/// name, trimmed, with continuation lines joined by newlines. Inline
/// `{@link}` tags are left as written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JsdocTag {
    pub name: String,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedJsdoc {
    /// Free text before the first tag, inline links reduced to their text
    pub summary: String,
    pub tags: Vec<JsdocTag>,
}

impl ParsedJsdoc {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.tags.is_empty()
    }

    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a JsdocTag> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }

    /// Description of parameter `name` from its `@param` tag.
    pub fn param_doc(&self, name: &str) -> Option<&str> {
        self.tags_named("param").find_map(|tag| {
            let (param, description) = split_param_tag(&tag.text)?;
            (param == name).then_some(description)
        })
    }

    /// First line of the summary.
    pub fn first_line(&self) -> &str {
        self.summary.lines().next().unwrap_or_default().trim()
    }
}

/// Parse comment content (gutter already stripped) into summary and tags.
pub fn parse_jsdoc(content: &str) -> ParsedJsdoc {
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut tags: Vec<(String, Vec<String>)> = Vec::new();

    // `@` at the start of a line inside a ``` fence is code, not a tag
    let mut in_fence = false;
    for line in content.lines() {
        let trimmed = line.trim_start();
        let fence = trimmed.starts_with("```");
        if fence {
            in_fence = !in_fence;
        }
        if let Some(rest) = trimmed.strip_prefix('@').filter(|_| !in_fence && !fence) {
            let name_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
                .unwrap_or(rest.len());
            if name_len > 0 {
                let name = rest[..name_len].to_string();
                let first = rest[name_len..].trim();
                tags.push((name, vec![first.to_string()]));
                continue;
            }
        }
        match tags.last_mut() {
            Some((_, lines)) => lines.push(line.to_string()),
            None => summary_lines.push(line),
        }
    }

    let summary = strip_inline_links(summary_lines.join("\n").trim());
    let tags = tags
        .into_iter()
        .map(|(name, lines)| {
            let joined = lines.join("\n");
            let text = if name == "example" {
                trim_blank_lines(&joined)
            } else {
                joined.trim().to_string()
            };
            JsdocTag { name, text }
        })
        .collect();
    ParsedJsdoc { summary, tags }
}

/// Split `@param` text into the parameter name and its description.
/// Understands `{type} name - desc`, `name desc` and `[name=default] desc`.
fn split_param_tag(text: &str) -> Option<(&str, &str)> {
    let mut rest = text.trim_start();
    if rest.starts_with('{') {
        let close = matching_brace(rest)?;
        rest = rest[close + 1..].trim_start();
    }
    let (name, description) = if let Some(bracketed) = rest.strip_prefix('[') {
        let close = bracketed.find(']')?;
        let inner = &bracketed[..close];
        let name = inner.split('=').next().unwrap_or(inner).trim();
        (name, &bracketed[close + 1..])
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (&rest[..end], &rest[end..])
    };
    let description = description.trim_start();
    let description = description.strip_prefix('-').unwrap_or(description);
    Some((name, description.trim()))
}

fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Replace `{@link Target}` and `{@link Target|text}` (also `linkcode` and
/// `linkplain`) with their display text.
fn strip_inline_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{@link") {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let Some(end) = after.find('}') else {
            out.push_str(after);
            return out;
        };
        let body = after[1..end]
            .trim_start_matches("@linkcode")
            .trim_start_matches("@linkplain")
            .trim_start_matches("@link")
            .trim();
        let display = match body.split_once('|') {
            Some((_, label)) => label.trim(),
            None => body.split_once(' ').map_or(body, |(target, label)| {
                if label.trim().is_empty() { target } else { label.trim() }
            }),
        };
        out.push_str(display);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_and_tags() {
        let doc = parse_jsdoc(
            "Returns the sum.\nSecond line.\n@param a first operand\n@param b - second\n  operand\n@returns the total",
        );
        assert_eq!(doc.summary, "Returns the sum.\nSecond line.");
        assert_eq!(doc.first_line(), "Returns the sum.");
        assert_eq!(doc.tags.len(), 3);
        assert_eq!(doc.param_doc("a"), Some("first operand"));
        assert_eq!(doc.param_doc("b"), Some("second\n  operand"));
        assert_eq!(doc.tags_named("returns").next().map(|t| t.text.as_str()), Some("the total"));
    }

    #[test]
    fn test_param_doc_with_type_and_default() {
        let doc = parse_jsdoc("@param {string} name - who to greet\n@param [count=1] how often");
        assert_eq!(doc.param_doc("name"), Some("who to greet"));
        assert_eq!(doc.param_doc("count"), Some("how often"));
        assert_eq!(doc.param_doc("missing"), None);
    }

    #[test]
    fn test_example_kept_verbatim() {
        let doc = parse_jsdoc("Maps values.\n@example\n  const x = [1].map({@link f});\n  x;\n");
        let example = doc.tags_named("example").next().map(|t| t.text.as_str());
        assert_eq!(example, Some("  const x = [1].map({@link f});\n  x;"));
    }

    #[test]
    fn test_inline_links_stripped() {
        let doc = parse_jsdoc("See {@link Array.from} and {@link Map|the map type}.");
        assert_eq!(doc.summary, "See Array.from and the map type.");
    }

    #[test]
    fn test_tag_text_keeps_inline_links() {
        let doc = parse_jsdoc("Old API.\n@deprecated Use {@link bar} instead\n@see {@link Baz|the baz}");
        assert_eq!(doc.summary, "Old API.");
        assert_eq!(doc.tags[0].text, "Use {@link bar} instead");
        assert_eq!(doc.tags[1].text, "{@link Baz|the baz}");
    }

    #[test]
    fn test_fenced_example_keeps_decorators() {
        let doc = parse_jsdoc(
            "Does f.\n@example\n```ts\n@Component()\nclass A {}\n```\n@custom hello",
        );
        let names: Vec<&str> = doc.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["example", "custom"]);
        assert_eq!(doc.tags[0].text, "```ts\n@Component()\nclass A {}\n```");
        assert_eq!(doc.tags[1].text, "hello");
    }

    #[test]
    fn test_no_summary() {
        let doc = parse_jsdoc("@deprecated use bar");
        assert!(doc.summary.is_empty());
        assert_eq!(doc.tags[0].name, "deprecated");
        assert_eq!(doc.tags[0].text, "use bar");
        assert!(!doc.is_empty());
    }
}
