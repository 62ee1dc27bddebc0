//! The ordered rewrite-rule tables for both conversion directions.
//!
//! Rule order is a correctness invariant, not a tuning knob: several
//! Markdown and Backlog symbols overlap (`#` opens both headings and issue
//! references, `*` marks both headings and emphasis in Backlog, `''` is a
//! substring of `'''`), and each table resolves those collisions by running
//! the more specific rule first. The tables are canonical and never
//! reordered at runtime.

use super::indent;
use crate::settings::ConversionSettings;
use regex::{Captures, Regex};

/// One rewrite rule: a regex pattern plus either a literal replacement
/// template (`$n` captures) or a function computing the replacement from
/// the captures and the current settings.
pub(crate) struct Rule {
    pub pattern: &'static str,
    pub replacement: Replacement,
}

pub(crate) enum Replacement {
    Template(&'static str),
    Compute(fn(&Captures, &ConversionSettings) -> String),
}

impl Rule {
    /// Apply this rule to the whole document, replacing every occurrence.
    pub fn apply(&self, content: &str, settings: &ConversionSettings) -> String {
        let re = Regex::new(self.pattern).unwrap();
        match self.replacement {
            Replacement::Template(template) => re.replace_all(content, template).into_owned(),
            Replacement::Compute(compute) => re
                .replace_all(content, |caps: &Captures| compute(caps, settings))
                .into_owned(),
        }
    }
}

/// Markdown to Backlog rule table.
///
/// Ordering constraints:
/// - images before links (an image is a link with a leading `!`)
/// - headings before emphasis (`#` runs are line-anchored, emphasis is not)
/// - keyword colors before generic bold (both match `**...**`)
/// - bold before italic (`*` is a substring of `**`)
/// - lists after emphasis, blocks (code, quote) late, `[TOC]` last
pub(crate) const MARKDOWN_TO_BACKLOG: &[Rule] = &[
    // ![alt](url) -> #image(url)
    Rule {
        pattern: r"!\[([^\]]*)\]\(([^)]+)\)",
        replacement: Replacement::Template("#image($2)"),
    },
    // # Heading -> * Heading (marker repetition encodes the level)
    Rule {
        pattern: r"(?m)^(#{1,6})\s+(.+)$",
        replacement: Replacement::Compute(heading_to_backlog),
    },
    // color keywords win over the generic bold rule
    Rule {
        pattern: r"\*\*(重要|注意|警告|エラー|危険)\*\*",
        replacement: Replacement::Template("&color(red) { $1 }"),
    },
    Rule {
        pattern: r"\*\*(成功|完了|OK)\*\*",
        replacement: Replacement::Template("&color(green) { $1 }"),
    },
    Rule {
        pattern: r"\*\*(情報|参考|メモ)\*\*",
        replacement: Replacement::Template("&color(blue) { $1 }"),
    },
    // **bold** -> ''bold''
    Rule {
        pattern: r"\*\*([^*\n]+)\*\*",
        replacement: Replacement::Template("''$1''"),
    },
    // *italic* -> '''italic'''
    Rule {
        pattern: r"\*([^*\n]+)\*",
        replacement: Replacement::Template("'''$1'''"),
    },
    // ~~strike~~ -> %%strike%%
    Rule {
        pattern: r"~~([^~]+)~~",
        replacement: Replacement::Template("%%$1%%"),
    },
    // bulleted list, nesting encoded as repeated dashes
    Rule {
        pattern: r"(?m)^([ \t]*)-\s+(.+)$",
        replacement: Replacement::Compute(bullet_to_backlog),
    },
    // numbered list, nesting stays encoded as indentation width
    Rule {
        pattern: r"(?m)^([ \t]*)(?:\d+)\.\s+(.+)$",
        replacement: Replacement::Compute(numbered_to_backlog),
    },
    // fenced code block; the language tag is dropped (not reversible)
    Rule {
        pattern: r"```([a-zA-Z]*)\n([\s\S]*?)```",
        replacement: Replacement::Template("{code}\n$2{/code}"),
    },
    // [text](url) -> [[text>url]]
    Rule {
        pattern: r"\[([^\]]+)\]\(([^)]+)\)",
        replacement: Replacement::Template("[[$1>$2]]"),
    },
    // #123 -> KEY-123 when a project key is configured
    Rule {
        pattern: r"#(\d+)",
        replacement: Replacement::Compute(issue_to_backlog),
    },
    // Markdown table header separator rows have no Backlog counterpart
    Rule {
        pattern: r"(?m)^\|(.+)\|$",
        replacement: Replacement::Compute(table_row_to_backlog),
    },
    // a run of > lines becomes one {quote} block
    Rule {
        pattern: r"(?m)^>[^\n]*(?:\n>[^\n]*)*",
        replacement: Replacement::Compute(quote_to_backlog),
    },
    // [TOC] -> #contents
    Rule {
        pattern: r"(?m)^\[TOC\]$",
        replacement: Replacement::Template("#contents"),
    },
];

/// Backlog to Markdown rule table.
///
/// Ordering constraints mirror the forward table: headings before anything
/// touching `*`, italic (`'''`) before bold (`''`) since the triple quote
/// contains the double quote, `[[text>url]]` before `[[text:url]]`.
pub(crate) const BACKLOG_TO_MARKDOWN: &[Rule] = &[
    // * Heading -> # Heading
    Rule {
        pattern: r"(?m)^(\*{1,6})\s+(.+)$",
        replacement: Replacement::Compute(heading_to_markdown),
    },
    // '''italic''' -> *italic*
    Rule {
        pattern: r"'''([^']+)'''",
        replacement: Replacement::Template("*$1*"),
    },
    // ''bold'' -> **bold**
    Rule {
        pattern: r"''([^']+)''",
        replacement: Replacement::Template("**$1**"),
    },
    // %%strike%% -> ~~strike~~
    Rule {
        pattern: r"%%([^%]+)%%",
        replacement: Replacement::Template("~~$1~~"),
    },
    // dash runs back to indented Markdown bullets
    Rule {
        pattern: r"(?m)^(-{1,6})\s+(.+)$",
        replacement: Replacement::Compute(bullet_to_markdown),
    },
    // + items back to 1. items, indentation preserved or re-tabbed
    Rule {
        pattern: r"(?m)^([ \t]*)\+\s+(.+)$",
        replacement: Replacement::Compute(numbered_to_markdown),
    },
    // {code}...{/code} -> bare fence, no language tag to restore
    Rule {
        pattern: r"\{code\}\n?([\s\S]*?)\{/code\}",
        replacement: Replacement::Compute(code_to_markdown),
    },
    // [[text>url]] -> [text](url)
    Rule {
        pattern: r"\[\[([^>\]]+)>([^\]]+)\]\]",
        replacement: Replacement::Template("[$1]($2)"),
    },
    // [[text:url]] -> [text](url)
    Rule {
        pattern: r"\[\[([^:\]]+):([^\]]+)\]\]",
        replacement: Replacement::Template("[$1]($2)"),
    },
    // KEY-123 -> #123 when the key matches the configured project key
    Rule {
        pattern: r"\b([A-Z][A-Z0-9_]*)-(\d+)\b",
        replacement: Replacement::Compute(issue_to_markdown),
    },
    // #image(url) -> ![](url)
    Rule {
        pattern: r"#image\(([^)]+)\)",
        replacement: Replacement::Template("![]($1)"),
    },
    // {quote}...{/quote} -> > prefixed lines
    Rule {
        pattern: r"\{quote\}\n?([\s\S]*?)\{/quote\}",
        replacement: Replacement::Compute(quote_to_markdown),
    },
    // #contents -> [TOC]
    Rule {
        pattern: r"#contents",
        replacement: Replacement::Template("[TOC]"),
    },
    // &color(class) { text } -> **text**
    Rule {
        pattern: r"&color\((red|green|blue)\)\s*\{\s*([^}]+?)\s*\}",
        replacement: Replacement::Template("**$2**"),
    },
];

fn heading_to_backlog(caps: &Captures, _settings: &ConversionSettings) -> String {
    let level = caps[1].len();
    format!("{} {}", "*".repeat(level), &caps[2])
}

fn heading_to_markdown(caps: &Captures, _settings: &ConversionSettings) -> String {
    let level = caps[1].len();
    format!("{} {}", "#".repeat(level), &caps[2])
}

fn bullet_to_backlog(caps: &Captures, _settings: &ConversionSettings) -> String {
    let level = indent::bullet_level(&caps[1]);
    format!("{} {}", "-".repeat(level), &caps[2])
}

fn numbered_to_backlog(caps: &Captures, _settings: &ConversionSettings) -> String {
    let level = indent::numbered_level(&caps[1]);
    format!("{}+ {}", "  ".repeat(level), &caps[2])
}

fn bullet_to_markdown(caps: &Captures, settings: &ConversionSettings) -> String {
    // a single dash is an unindented item
    let level = caps[1].len() - 1;
    let indent = indent::markdown_indent(level, settings.use_tabs_for_indent);
    format!("{}- {}", indent, &caps[2])
}

fn numbered_to_markdown(caps: &Captures, settings: &ConversionSettings) -> String {
    let indent = if settings.use_tabs_for_indent && !caps[1].is_empty() {
        indent::spaces_to_tabs(&caps[1])
    } else {
        caps[1].to_string()
    };
    format!("{}1. {}", indent, &caps[2])
}

fn issue_to_backlog(caps: &Captures, settings: &ConversionSettings) -> String {
    if settings.project_key.is_empty() {
        caps[0].to_string()
    } else {
        format!("{}-{}", settings.project_key, &caps[1])
    }
}

fn issue_to_markdown(caps: &Captures, settings: &ConversionSettings) -> String {
    if !settings.project_key.is_empty() && &caps[1] == settings.project_key.as_str() {
        format!("#{}", &caps[2])
    } else {
        caps[0].to_string()
    }
}

fn table_row_to_backlog(caps: &Captures, _settings: &ConversionSettings) -> String {
    let is_separator = caps[1]
        .chars()
        .all(|c| matches!(c, '-' | '|' | ':') || c.is_whitespace());
    if is_separator {
        String::new()
    } else {
        caps[0].to_string()
    }
}

fn quote_to_backlog(caps: &Captures, _settings: &ConversionSettings) -> String {
    let body = caps[0]
        .lines()
        .map(strip_quote_marker)
        .collect::<Vec<_>>()
        .join("\n");
    format!("{{quote}}\n{}\n{{/quote}}", body)
}

/// Strip the leading `>` and at most one following space.
fn strip_quote_marker(line: &str) -> &str {
    let rest = line.strip_prefix('>').unwrap_or(line);
    rest.strip_prefix(' ').unwrap_or(rest)
}

fn quote_to_markdown(caps: &Captures, _settings: &ConversionSettings) -> String {
    caps[1]
        .trim()
        .lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn code_to_markdown(caps: &Captures, _settings: &ConversionSettings) -> String {
    // the capture keeps the newline that preceded {/code}; drop it so the
    // closing fence supplies its own
    let code = caps[1].strip_suffix('\n').unwrap_or(&caps[1]);
    format!("```\n{}\n```", code)
}
