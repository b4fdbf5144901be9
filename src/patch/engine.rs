//! Splice logic for the function-level patch engine.
//!
//! The transformation is `(document, function name, raw replacement) ->
//! updated document`. Replacement text arrives straight from a model reply,
//! so it may still carry markdown fences and arbitrary indentation; it is
//! normalized, validated standalone, re-indented to the target's captured
//! prefix, and spliced over the original line region. Nothing touches disk
//! until every step has succeeded.

use std::path::Path;

use crate::error::{Error, Result};

use super::locate::{find_declaration, Declaration};
use super::parser::PythonParser;

/// Apply a patch to a file on disk.
///
/// Fails with [`Error::NotFound`] before any parsing when the file does not
/// exist. On success the file is rewritten with a single write; on any
/// failure it is left byte-for-byte unchanged.
pub fn patch_file(path: &Path, function_name: &str, raw_replacement: &str) -> Result<String> {
    if !path.exists() {
        return Err(Error::NotFound(format!("file '{}'", path.display())));
    }

    let document = std::fs::read_to_string(path)?;
    let (decl, updated) = locate_and_splice(&document, function_name, raw_replacement)?;
    std::fs::write(path, updated)?;

    Ok(format!("updated {} in {}", decl, path.display()))
}

/// Replace the named function's region in `document` and return the spliced
/// text. Pure with respect to the filesystem.
pub fn apply_patch(document: &str, function_name: &str, raw_replacement: &str) -> Result<String> {
    locate_and_splice(document, function_name, raw_replacement).map(|(_, updated)| updated)
}

fn locate_and_splice(
    document: &str,
    function_name: &str,
    raw_replacement: &str,
) -> Result<(Declaration, String)> {
    let mut parser = PythonParser::new()?;
    let tree = parser.parse_checked(document)?;

    let decl = find_declaration(&tree, document, function_name)
        .ok_or_else(|| Error::NotFound(format!("function '{function_name}'")))?;

    let normalized = strip_code_fence(raw_replacement);
    if normalized.is_empty() {
        return Err(Error::Syntax("replacement is empty".into()));
    }
    parser.parse_checked(&normalized)?;

    let replacement = reindent(&dedent(&normalized), &decl.indent_prefix);

    // Split on '\n' rather than lines() so carriage returns stay inside the
    // untouched lines and CRLF regions survive the splice byte-for-byte.
    let lines: Vec<&str> = document.split('\n').collect();
    let mut spliced: Vec<&str> = Vec::with_capacity(lines.len());
    spliced.extend(&lines[..decl.start_line]);
    spliced.extend(replacement.iter().map(String::as_str));
    spliced.extend(&lines[decl.end_line.min(lines.len())..]);

    let updated = spliced.join("\n");
    Ok((decl, updated))
}

/// Strip a leading and trailing markdown fence line if present.
///
/// The opening fence may carry a language tag (```` ```python ````); the
/// whole fence line is dropped. Text without fences is returned verbatim,
/// trimmed of surrounding blank space.
pub fn strip_code_fence(raw: &str) -> String {
    let mut body = raw.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => "",
        };
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest.strip_suffix('\n').unwrap_or(rest);
    }
    body.trim().to_string()
}

/// Remove the longest common leading-whitespace prefix of all non-blank
/// lines. The comparison is string-wise so tab indentation dedents as a
/// unit instead of being conflated with spaces.
fn dedent(text: &str) -> String {
    let mut prefix: Option<&str> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        prefix = Some(match prefix {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let prefix = prefix.unwrap_or("");

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                line.strip_prefix(prefix).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

/// Prefix every non-blank line with the captured indent. Blank lines stay
/// empty so intentional vertical spacing carries no trailing whitespace.
fn reindent(text: &str, indent_prefix: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{indent_prefix}{line}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const FIXTURE: &str = "\
def alpha():
    return 1

def beta(x):
    return x * 2

def gamma():
    pass

class First:
    def ping(self):
        return \"first\"

    def shared(self):
        return 1

class Second:
    def shared(self):
        return 2

    def pong(self):
        return \"second\"
";

    fn temp_fixture(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mender_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn noop_replacement_round_trips() {
        let replacement = "def beta(x):\n    return x * 2";
        let updated = apply_patch(FIXTURE, "beta", replacement).unwrap();
        assert_eq!(updated, FIXTURE);

        let mut parser = PythonParser::new().unwrap();
        assert!(parser.parse_checked(&updated).is_ok());
    }

    #[test]
    fn first_match_tie_break_rewrites_first_class_only() {
        let replacement = "def shared(self):\n    return 99";
        let updated = apply_patch(FIXTURE, "shared", replacement).unwrap();

        let second_class = updated.find("class Second").unwrap();
        assert!(updated[..second_class].contains("return 99"));
        assert!(!updated[second_class..].contains("return 99"));
        assert!(updated[second_class..].contains("return 2"));
    }

    #[test]
    fn indentation_is_rebuilt_from_the_original_prefix() {
        // 2-space internal indentation in the replacement; the original
        // method sits behind a 4-space class prefix.
        let replacement = "def shared(self):\n  value = 3\n  return value";
        let updated = apply_patch(FIXTURE, "shared", replacement).unwrap();

        assert!(updated.contains("    def shared(self):\n      value = 3\n      return value"));
    }

    #[test]
    fn fenced_and_unfenced_replacements_splice_identically() {
        let bare = "def gamma():\n    return 7";
        let fenced = "```python\ndef gamma():\n    return 7\n```";
        let from_bare = apply_patch(FIXTURE, "gamma", bare).unwrap();
        let from_fenced = apply_patch(FIXTURE, "gamma", fenced).unwrap();
        assert_eq!(from_bare, from_fenced);
        assert!(from_bare.contains("def gamma():\n    return 7"));
    }

    #[test]
    fn unknown_function_is_not_found() {
        let err = apply_patch(FIXTURE, "zeta", "def zeta():\n    pass").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("zeta"));
    }

    #[test]
    fn invalid_replacement_fails_before_splicing() {
        let err = apply_patch(FIXTURE, "alpha", "def alpha(:\n    pass").unwrap_err();
        assert!(matches!(err, Error::Syntax(_)));
    }

    #[test]
    fn empty_replacement_is_rejected() {
        for raw in ["", "   ", "```python\n```", "```\n```"] {
            let err = apply_patch(FIXTURE, "alpha", raw).unwrap_err();
            assert!(matches!(err, Error::Syntax(_)), "raw: {raw:?}");
        }
    }

    #[test]
    fn header_without_body_is_rejected() {
        let err = apply_patch(FIXTURE, "alpha", "def alpha():").unwrap_err();
        assert!(matches!(err, Error::Syntax(_)));
    }

    #[test]
    fn invalid_document_is_rejected() {
        let err = apply_patch("def broken(:\n    pass\n", "broken", "def broken():\n    pass")
            .unwrap_err();
        assert!(matches!(err, Error::Syntax(_)));
    }

    #[test]
    fn crlf_untouched_regions_are_preserved() {
        let document = "def alpha():\r\n    return 1\r\n\r\ndef beta(x):\r\n    return x * 2\r\n";
        let updated = apply_patch(document, "beta", "def beta(x):\n    return x + 1").unwrap();

        assert!(updated.starts_with("def alpha():\r\n    return 1\r\n\r\n"));
        assert!(updated.contains("def beta(x):\n    return x + 1"));
    }

    #[test]
    fn blank_lines_in_replacement_stay_blank() {
        let replacement = "def shared(self):\n    a = 1\n\n    return a";
        let updated = apply_patch(FIXTURE, "shared", replacement).unwrap();
        // The interior blank line gets no indent prefix.
        assert!(updated.contains("        a = 1\n\n        return a"));
    }

    #[test]
    fn tab_indented_replacement_dedents_as_a_unit() {
        let replacement = "\tdef gamma():\n\t\treturn 5";
        let updated = apply_patch(FIXTURE, "gamma", replacement).unwrap();
        assert!(updated.contains("def gamma():\n\treturn 5"));
    }

    #[test]
    fn mixed_indentation_uses_common_prefix() {
        let replacement = "  def gamma():\n      return 6";
        let updated = apply_patch(FIXTURE, "gamma", replacement).unwrap();
        assert!(updated.contains("def gamma():\n    return 6"));
    }

    #[test]
    fn missing_file_short_circuits() {
        let path = PathBuf::from("/nonexistent/mender/target.py");
        let err = patch_file(&path, "alpha", "def alpha():\n    pass").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn failed_patch_leaves_file_untouched() {
        let path = temp_fixture("atomic.py", FIXTURE);
        let before = std::fs::read(&path).unwrap();

        let err = patch_file(&path, "alpha", "def alpha(:\n    pass").unwrap_err();
        assert!(matches!(err, Error::Syntax(_)));

        let after = std::fs::read(&path).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn successful_patch_rewrites_file() {
        let path = temp_fixture("rewrite.py", FIXTURE);
        let confirmation =
            patch_file(&path, "alpha", "```python\ndef alpha():\n    return 10\n```").unwrap();
        assert!(confirmation.contains("alpha"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("def alpha():\n    return 10"));
        assert!(contents.contains("def beta(x):"));
    }

    #[test]
    fn method_confirmation_names_the_class() {
        let path = temp_fixture("method.py", FIXTURE);
        let confirmation =
            patch_file(&path, "ping", "def ping(self):\n    return \"pinged\"").unwrap();
        assert!(confirmation.contains("method 'First.ping'"));
    }

    #[test]
    fn fence_with_language_tag_is_stripped() {
        assert_eq!(
            strip_code_fence("```python\ndef f():\n    pass\n```"),
            "def f():\n    pass"
        );
        assert_eq!(
            strip_code_fence("```bash\necho hi\n```"),
            "echo hi"
        );
        assert_eq!(
            strip_code_fence("```\ndef f():\n    pass\n```"),
            "def f():\n    pass"
        );
        assert_eq!(strip_code_fence("def f():\n    pass"), "def f():\n    pass");
    }

    #[test]
    fn dedent_ignores_blank_lines() {
        assert_eq!(
            dedent("    a = 1\n\n    b = 2"),
            "a = 1\n\nb = 2"
        );
    }
}
