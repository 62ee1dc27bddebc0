//! Integration tests for the Markdown to Backlog direction

use backmark::converter::BacklogConverter;
use backmark::settings::{ConversionSettings, CustomRule};

fn convert(md: &str) -> String {
    BacklogConverter::default().convert_to_backlog(md)
}

#[test]
fn test_headings() {
    assert_eq!(convert("# 見出し1"), "* 見出し1");
    assert_eq!(convert("###### 見出し6"), "****** 見出し6");
}

#[test]
fn test_flat_bullet_list() {
    let input = "- アイテム1\n- アイテム2\n- アイテム3";
    assert_eq!(convert(input), "- アイテム1\n- アイテム2\n- アイテム3");
}

#[test]
fn test_nested_bullet_list_space_indent() {
    let input = "- アイテム1\n  - サブアイテム1\n    - サブサブアイテム1\n- アイテム2";
    let expected = "- アイテム1\n-- サブアイテム1\n--- サブサブアイテム1\n- アイテム2";
    assert_eq!(convert(input), expected);
}

#[test]
fn test_nested_bullet_list_tab_indent() {
    let input = "- アイテム1\n\t- サブアイテム1\n\t\t- サブサブアイテム1";
    let expected = "- アイテム1\n-- サブアイテム1\n--- サブサブアイテム1";
    assert_eq!(convert(input), expected);
}

#[test]
fn test_bullet_nesting_clamped_at_six() {
    let input = "\t\t\t\t\t\t\t- deep";
    assert_eq!(convert(input), "------ deep");
}

#[test]
fn test_numbered_list() {
    let input = "1. アイテム1\n2. アイテム2\n3. アイテム3";
    assert_eq!(convert(input), "+ アイテム1\n+ アイテム2\n+ アイテム3");
}

#[test]
fn test_numbered_list_keeps_indent_hierarchy() {
    let input = "1. アイテム1\n  1. サブアイテム1\n    1. サブサブアイテム1";
    let expected = "+ アイテム1\n  + サブアイテム1\n    + サブサブアイテム1";
    assert_eq!(convert(input), expected);
}

#[test]
fn test_code_block_without_language() {
    let input = "```\nconsole.log(\"Hello\");\n```";
    assert_eq!(convert(input), "{code}\nconsole.log(\"Hello\");\n{/code}");
}

#[test]
fn test_code_block_language_tag_is_dropped() {
    let input = "```javascript\nconsole.log(\"Hello\");\n```";
    assert_eq!(convert(input), "{code}\nconsole.log(\"Hello\");\n{/code}");
}

#[test]
fn test_code_block_multiline() {
    let input = "```\nfunction test() {\n  return \"hello\";\n}\n```";
    let expected = "{code}\nfunction test() {\n  return \"hello\";\n}\n{/code}";
    assert_eq!(convert(input), expected);
}

#[test]
fn test_single_line_quote() {
    assert_eq!(convert("> これは引用です"), "{quote}\nこれは引用です\n{/quote}");
}

#[test]
fn test_multi_line_quote_is_one_block() {
    let input = "> 引用行1\n> 引用行2\n> 引用行3";
    assert_eq!(convert(input), "{quote}\n引用行1\n引用行2\n引用行3\n{/quote}");
}

#[test]
fn test_quote_block_between_paragraphs() {
    let input = "before\n> 引用行1\n> 引用行2\nafter";
    assert_eq!(convert(input), "before\n{quote}\n引用行1\n引用行2\n{/quote}\nafter");
}

#[test]
fn test_toc_marker() {
    assert_eq!(convert("[TOC]"), "#contents");
}

#[test]
fn test_image_without_alt_text() {
    assert_eq!(
        convert("![](https://example.com/image.png)"),
        "#image(https://example.com/image.png)"
    );
}

#[test]
fn test_long_heading() {
    let long_text = "a".repeat(10000);
    assert_eq!(convert(&format!("# {}", long_text)), format!("* {}", long_text));
}

#[test]
fn test_custom_rule_applies_after_builtin_table() {
    let settings = ConversionSettings {
        custom_rules: vec![CustomRule {
            // matches the converted heading marker, proving it runs last
            pattern: r"(?m)^\* ".to_string(),
            replacement: "*! ".to_string(),
        }],
        ..Default::default()
    };
    let converter = BacklogConverter::new(settings);
    assert_eq!(converter.convert_to_backlog("# Title"), "*! Title");
}

#[test]
fn test_full_document_conversion() {
    let md = "\
# ドキュメント

**重要** な内容と **太字** です。

- リスト1
  - サブ
1. 手順1

```python
print(\"hi\")
```

> 引用です

[リンク](https://example.com)
[TOC]";

    let backlog = convert(md);

    assert!(backlog.contains("* ドキュメント"));
    assert!(backlog.contains("&color(red) { 重要 }"));
    assert!(backlog.contains("''太字''"));
    assert!(backlog.contains("- リスト1\n-- サブ"));
    assert!(backlog.contains("+ 手順1"));
    assert!(backlog.contains("{code}\nprint(\"hi\")\n{/code}"));
    assert!(backlog.contains("{quote}\n引用です\n{/quote}"));
    assert!(backlog.contains("[[リンク>https://example.com]]"));
    assert!(backlog.contains("#contents"));
}
