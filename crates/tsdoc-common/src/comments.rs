//! Comment ranges and JSDoc helpers.
//!
//! Comments are not part of the AST. The scanner records every comment it
//! skips as a [`CommentRange`], sorted by position, and declarations look up
//! their documentation comment from that list.

use serde::Serialize;

/// A range representing a comment in the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentRange {
    /// Start position (byte offset)
    pub pos: u32,
    /// End position (byte offset)
    pub end: u32,
    /// Whether this is a multi-line comment
    pub is_multi_line: bool,
}

impl CommentRange {
    /// Create a new comment range.
    pub fn new(pos: u32, end: u32, is_multi_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
        }
    }

    /// Get the comment text from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.pos as usize;
        let end = self.end as usize;
        if end <= source.len() && start < end {
            &source[start..end]
        } else {
            ""
        }
    }
}

/// Check if a comment is a JSDoc comment.
pub fn is_jsdoc_comment(comment: &CommentRange, source: &str) -> bool {
    let text = comment.get_text(source);
    text.starts_with("/**") && !text.starts_with("/***") && text != "/**/"
}

/// Check if a comment is a triple-slash directive.
pub fn is_triple_slash_directive(comment: &CommentRange, source: &str) -> bool {
    comment.get_text(source).starts_with("///")
}

/// Extract the content of a JSDoc comment (without the delimiters).
///
/// The leading `*` gutter and one following space are removed from each
/// line; any further indentation is kept so code inside `@example` blocks
/// survives verbatim.
pub fn get_jsdoc_content(comment: &CommentRange, source: &str) -> String {
    let text = comment.get_text(source);
    if !(text.starts_with("/**") && text.ends_with("*/")) || text.len() < 5 {
        return String::new();
    }
    let inner = &text[3..text.len() - 2];
    let lines: Vec<&str> = inner
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => trimmed,
            }
        })
        .map(str::trim_end)
        .collect();

    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

/// Find the JSDoc comment attached to a declaration starting at `pos`.
///
/// `comments` must be sorted by position. The attached comment is the last
/// JSDoc comment that ends before `pos` with only whitespace in between.
pub fn leading_jsdoc<'c>(
    comments: &'c [CommentRange],
    pos: u32,
    source: &str,
) -> Option<&'c CommentRange> {
    let idx = comments.partition_point(|c| c.end <= pos);
    let comment = comments.get(idx.checked_sub(1)?)?;
    let between = source.get(comment.end as usize..pos as usize)?;
    if !between.trim().is_empty() || !is_jsdoc_comment(comment, source) {
        return None;
    }
    Some(comment)
}

/// Extract `/// <reference path="..." />` targets from the file header.
pub fn reference_paths(comments: &[CommentRange], source: &str) -> Vec<String> {
    comments
        .iter()
        .filter(|c| is_triple_slash_directive(c, source))
        .filter_map(|c| directive_attribute(c.get_text(source), "path"))
        .map(str::to_string)
        .collect()
}

fn directive_attribute<'a>(line: &'a str, attr: &str) -> Option<&'a str> {
    let needle = format!("{attr}=");
    let start = line.find(&needle)? + needle.len();
    let quote = line[start..].chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let rest = &line[start + 1..];
    let end = rest.find(quote)?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsdoc_content_keeps_example_indentation() {
        let source = "/**\n * Summary.\n * @example\n *   foo(1);\n */";
        let comment = CommentRange::new(0, source.len() as u32, true);
        assert_eq!(
            get_jsdoc_content(&comment, source),
            "Summary.\n@example\n  foo(1);"
        );
    }

    #[test]
    fn test_leading_jsdoc_requires_adjacency() {
        let source = "/** doc */\ninterface A {}\n/** stray */ const x = 1;\ninterface B {}";
        let comments = vec![
            CommentRange::new(0, 10, true),
            CommentRange::new(26, 38, true),
        ];
        assert!(leading_jsdoc(&comments, 11, source).is_some());
        let b_pos = source.find("interface B").unwrap() as u32;
        assert!(leading_jsdoc(&comments, b_pos, source).is_none());
    }

    #[test]
    fn test_plain_block_comment_is_not_jsdoc() {
        let source = "/* nope */";
        let comment = CommentRange::new(0, source.len() as u32, true);
        assert!(!is_jsdoc_comment(&comment, source));
    }

    #[test]
    fn test_reference_paths() {
        let source = "/// <reference path=\"./globals.d.ts\" />\n/// <reference types=\"node\" />";
        let newline = source.find('\n').unwrap() as u32;
        let comments = vec![
            CommentRange::new(0, newline, false),
            CommentRange::new(newline + 1, source.len() as u32, false),
        ];
        assert_eq!(reference_paths(&comments, source), vec!["./globals.d.ts"]);
    }
}
