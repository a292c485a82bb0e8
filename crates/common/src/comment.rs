//! Proto comment to target-language comment fragment

/// Label used when the caller does not supply one
pub const DEFAULT_COMMENT_LABEL: &str = "//";

/// Input accepted by [`assemble_comment`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentInput<'a> {
    pub comment: Option<&'a str>,
    /// Prefix placed before the comment body; `None` means `//`
    pub label: Option<&'a str>,
    /// Append a trailing line break so the fragment can precede code
    pub inline: bool,
}

impl<'a> CommentInput<'a> {
    pub fn new(comment: Option<&'a str>) -> Self {
        Self {
            comment,
            ..Default::default()
        }
    }

    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }
}

impl<'a> From<&'a str> for CommentInput<'a> {
    fn from(comment: &'a str) -> Self {
        CommentInput::new(Some(comment))
    }
}

impl<'a> From<Option<&'a str>> for CommentInput<'a> {
    fn from(comment: Option<&'a str>) -> Self {
        CommentInput::new(comment)
    }
}

impl<'a> From<&'a Option<String>> for CommentInput<'a> {
    fn from(comment: &'a Option<String>) -> Self {
        CommentInput::new(comment.as_deref())
    }
}

/// Render a comment as a single-line fragment
///
/// Empty or missing comments render as an empty string. Line breaks inside
/// the body (`\n`, `\r\n` or a lone `\r`) are folded into single spaces.
///
/// # Examples
/// ```
/// use proto_converter_common::{assemble_comment, CommentInput};
///
/// assert_eq!(assemble_comment(None::<&str>), "");
/// assert_eq!(assemble_comment("hello"), "//hello");
/// assert_eq!(
///     assemble_comment(CommentInput::new(Some(" hi")).label("#").inline(true)),
///     "# hi\n"
/// );
/// ```
pub fn assemble_comment<'a>(input: impl Into<CommentInput<'a>>) -> String {
    let input = input.into();
    let comment = match input.comment {
        Some(comment) if !comment.is_empty() => comment,
        _ => return String::new(),
    };

    let body = comment
        .split(['\r', '\n'])
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let label = input.label.unwrap_or(DEFAULT_COMMENT_LABEL);
    let trailer = if input.inline { "\n" } else { "" };

    format!("{}{}{}", label, body, trailer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_comments() {
        assert_eq!(assemble_comment(None::<&str>), "");
        assert_eq!(assemble_comment(""), "");
        assert_eq!(assemble_comment(CommentInput::new(Some("")).inline(true)), "");
    }

    #[test]
    fn test_multiline_is_single_line() {
        let out = assemble_comment("line1\nline2");
        assert!(!out.contains('\n'));
        assert_eq!(out, "//line1 line2");

        let out = assemble_comment("line1\r\nline2\r\n");
        assert_eq!(out, "//line1 line2");

        let out = assemble_comment("old mac\rline");
        assert_eq!(out, "//old mac line");
    }

    #[test]
    fn test_blank_comment_keeps_label() {
        assert_eq!(assemble_comment("  \n "), "//");
        assert_eq!(
            assemble_comment(CommentInput::new(Some(" ")).label("# ").inline(true)),
            "# \n"
        );
    }

    #[test]
    fn test_empty_label_is_kept() {
        let out = assemble_comment(CommentInput::new(Some("Fetch a user")).label(""));
        assert_eq!(out, "Fetch a user");
    }

    #[test]
    fn test_inline_appends_line_break() {
        let out = assemble_comment(CommentInput::new(Some(" id")).inline(true));
        assert_eq!(out, "// id\n");
    }

    #[test]
    fn test_from_owned_option() {
        let comment = Some("owned".to_string());
        assert_eq!(assemble_comment(&comment), "//owned");
        let missing: Option<String> = None;
        assert_eq!(assemble_comment(&missing), "");
    }
}
