//! Indentation-level codec for the list rules.
//!
//! Markdown encodes list nesting with leading whitespace; Backlog encodes
//! bulleted nesting with repeated `-` markers and numbered nesting with
//! indentation width. The two directions are therefore asymmetric.

/// Nesting level of a Markdown bulleted-list line, from its leading
/// whitespace. One tab or two spaces count as one extra level; a line with
/// no indentation is level 1. Backlog supports at most six levels, deeper
/// nesting is clamped (not reversible).
pub(crate) fn bullet_level(indent: &str) -> usize {
    let tabs = indent.chars().filter(|&c| c == '\t').count();
    let spaces = indent.chars().filter(|&c| c == ' ').count();
    (1 + tabs + spaces / 2).min(6)
}

/// Nesting level of a Markdown numbered-list line. Unlike bullets there is
/// no implicit first level: an unindented line is level 0.
pub(crate) fn numbered_level(indent: &str) -> usize {
    let tabs = indent.chars().filter(|&c| c == '\t').count();
    let spaces = indent.chars().filter(|&c| c == ' ').count();
    tabs + spaces / 2
}

/// Markdown indentation for `level` nesting steps, as tabs or two-space
/// units depending on the settings.
pub(crate) fn markdown_indent(level: usize, use_tabs: bool) -> String {
    if use_tabs {
        "\t".repeat(level)
    } else {
        "  ".repeat(level)
    }
}

/// Re-encode a space indent as tabs, two spaces per tab. An odd leftover
/// space is discarded.
pub(crate) fn spaces_to_tabs(indent: &str) -> String {
    let spaces = indent.chars().filter(|&c| c == ' ').count();
    "\t".repeat(spaces / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_level_flat() {
        assert_eq!(bullet_level(""), 1);
    }

    #[test]
    fn test_bullet_level_tabs() {
        assert_eq!(bullet_level("\t"), 2);
        assert_eq!(bullet_level("\t\t"), 3);
    }

    #[test]
    fn test_bullet_level_spaces() {
        assert_eq!(bullet_level(" "), 1);
        assert_eq!(bullet_level("  "), 2);
        assert_eq!(bullet_level("    "), 3);
    }

    #[test]
    fn test_bullet_level_mixed() {
        assert_eq!(bullet_level("\t  "), 3);
    }

    #[test]
    fn test_bullet_level_clamped_to_six() {
        assert_eq!(bullet_level("\t\t\t\t\t\t\t\t"), 6);
        assert_eq!(bullet_level("                "), 6);
    }

    #[test]
    fn test_numbered_level_has_no_implicit_first() {
        assert_eq!(numbered_level(""), 0);
        assert_eq!(numbered_level("  "), 1);
        assert_eq!(numbered_level("\t"), 1);
    }

    #[test]
    fn test_markdown_indent() {
        assert_eq!(markdown_indent(2, true), "\t\t");
        assert_eq!(markdown_indent(2, false), "    ");
        assert_eq!(markdown_indent(0, true), "");
    }

    #[test]
    fn test_spaces_to_tabs_discards_odd_space() {
        assert_eq!(spaces_to_tabs("    "), "\t\t");
        assert_eq!(spaces_to_tabs("   "), "\t");
        assert_eq!(spaces_to_tabs(""), "");
    }
}
