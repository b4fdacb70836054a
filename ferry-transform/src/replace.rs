//! Template-based text replacement.
//!
//! `before` and `after` are templates: literal text plus `${name}`
//! placeholders. Each placeholder names a regex declared in `regex_groups`;
//! in `before` it becomes a named capture, in `after` it inserts whatever
//! that capture matched. Literal text is matched literally.
//!
//! ```text
//! before       = "${linestart}${number}"
//! after        = "${linestart}TRANSFORMED${number}"
//! regex_groups = { number: "[0-9]+", linestart: "^" }
//! multiline    = true
//!
//! "1\n42"  ->  "TRANSFORMED1\nTRANSFORMED42"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use regex::Regex;

use ferry_core::{tree, Glob, ValidationError};

use crate::context::MigrationContext;
use crate::error::{io_err, TransformError};
use crate::transformation::{not_reversible, Transformation};

// ---------------------------------------------------------------------------
// Template parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Group(String),
}

fn parse_template(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find('}') else {
            break;
        };
        let name = &after_open[..end];
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            literal.push_str(&rest[..start + 2]);
            rest = after_open;
            continue;
        }
        literal.push_str(&rest[..start]);
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(Token::Group(name.to_string()));
        rest = &after_open[end + 1..];
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

fn group_names(tokens: &[Token]) -> impl Iterator<Item = &str> {
    tokens.iter().filter_map(|t| match t {
        Token::Group(name) => Some(name.as_str()),
        Token::Literal(_) => None,
    })
}

// ---------------------------------------------------------------------------
// Replace
// ---------------------------------------------------------------------------

/// Rewrites every matching file under the checkout.
#[derive(Debug, Clone)]
pub struct Replace {
    before: String,
    after: String,
    regex_groups: BTreeMap<String, String>,
    multiline: bool,
    paths: Glob,
    pattern: Regex,
    replacement: String,
}

impl Replace {
    pub fn new(
        before: impl Into<String>,
        after: impl Into<String>,
        regex_groups: BTreeMap<String, String>,
        multiline: bool,
        paths: Glob,
    ) -> Result<Self, ValidationError> {
        let before = before.into();
        let after = after.into();
        let before_tokens = parse_template(&before);
        let after_tokens = parse_template(&after);

        let mut used = BTreeSet::new();
        for name in group_names(&before_tokens) {
            if !used.insert(name) {
                return Err(ValidationError::Invalid(format!(
                    "Regex group '{name}' is used more than once in 'before': {before}"
                )));
            }
        }
        for name in group_names(&before_tokens).chain(group_names(&after_tokens)) {
            if !regex_groups.contains_key(name) {
                return Err(ValidationError::Invalid(format!(
                    "Group '{name}' is used in a template but not declared in regex_groups"
                )));
            }
        }
        if let Some(unused) = regex_groups.keys().find(|k| !used.contains(k.as_str())) {
            return Err(ValidationError::Invalid(format!(
                "Group '{unused}' is declared in regex_groups but not used in 'before': {before}"
            )));
        }

        let mut source = String::new();
        if multiline {
            source.push_str("(?m)");
        }
        for token in &before_tokens {
            match token {
                Token::Literal(text) => source.push_str(&regex::escape(text)),
                Token::Group(name) => {
                    source.push_str(&format!("(?P<{name}>{})", regex_groups[name]));
                }
            }
        }
        let pattern = Regex::new(&source).map_err(|e| {
            ValidationError::Invalid(format!("Cannot compile 'before' template '{before}': {e}"))
        })?;

        let replacement = after_tokens
            .iter()
            .map(|token| match token {
                Token::Literal(text) => text.replace('$', "$$"),
                Token::Group(name) => format!("${{{name}}}"),
            })
            .collect();

        Ok(Self {
            before,
            after,
            regex_groups,
            multiline,
            paths,
            pattern,
            replacement,
        })
    }

    /// Plain literal replacement over every file.
    pub fn literal(before: impl Into<String>, after: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(before, after, BTreeMap::new(), false, Glob::all())
    }

    /// Apply to one string; `None` when nothing changed.
    fn apply(&self, text: &str) -> Option<String> {
        let replaced = self.pattern.replace_all(text, self.replacement.as_str());
        (replaced != text).then(|| replaced.into_owned())
    }
}

impl Transformation for Replace {
    fn transform(&self, ctx: &mut MigrationContext<'_>) -> Result<(), TransformError> {
        let root = ctx.checkout().to_path_buf();
        let mut changed = 0usize;
        for rel in tree::list_files(&root)? {
            if !self.paths.matches(&rel) {
                continue;
            }
            let path = root.join(&rel);
            let bytes = std::fs::read(&path).map_err(|e| io_err(&path, e))?;
            let Ok(text) = std::str::from_utf8(&bytes) else {
                tracing::debug!("skipping non UTF-8 file {}", rel.display());
                continue;
            };
            if let Some(updated) = self.apply(text) {
                std::fs::write(&path, updated).map_err(|e| io_err(&path, e))?;
                changed += 1;
            }
        }
        tracing::debug!("{}: {changed} file(s) changed", self.describe());
        if changed == 0 {
            return ctx.report_noop(&self.describe(), "no file was changed");
        }
        Ok(())
    }

    fn reverse(&self) -> Result<Arc<dyn Transformation>, TransformError> {
        let reversed = Replace::new(
            self.after.clone(),
            self.before.clone(),
            self.regex_groups.clone(),
            self.multiline,
            self.paths.clone(),
        )
        .map_err(|e| {
            tracing::debug!("cannot reverse {}: {e}", self.describe());
            not_reversible(self)
        })?;
        Ok(Arc::new(reversed))
    }

    fn describe(&self) -> String {
        format!("Replacing '{}' with '{}'", self.before, self.after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Changes;
    use ferry_core::{Author, MessageKind, RecordingConsole};
    use rstest::rstest;
    use std::path::Path;
    use tempfile::TempDir;

    fn groups(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn numbers() -> Replace {
        Replace::new(
            "${linestart}${number}",
            "${linestart}TRANSFORMED${number}",
            groups(&[("number", "[0-9]+"), ("linestart", "^")]),
            true,
            Glob::all(),
        )
        .expect("valid replace")
    }

    fn run(step: &dyn Transformation, dir: &Path, ignore_noop: bool) -> (Result<(), TransformError>, RecordingConsole) {
        let console = RecordingConsole::new();
        let result = {
            let mut ctx = MigrationContext::new(
                dir,
                "msg",
                Author::new("Foo", "foo@bar.com"),
                Changes::default(),
                &console,
            )
            .with_ignore_noop(ignore_noop);
            step.transform(&mut ctx)
        };
        (result, console)
    }

    #[test]
    fn multiline_groups_rewrite_each_line() {
        assert_eq!(
            numbers().apply("1\n42").as_deref(),
            Some("TRANSFORMED1\nTRANSFORMED42")
        );
        assert_eq!(
            numbers().apply("1\nTRANSFORMED42").as_deref(),
            Some("TRANSFORMED1\nTRANSFORMED42")
        );
    }

    #[test]
    fn literal_text_is_not_a_regex() {
        let replace = Replace::literal("a.b", "$1 c").expect("valid");
        assert_eq!(replace.apply("a.b axb").as_deref(), Some("$1 c axb"));
    }

    #[rstest]
    #[case("${a}${a}", "${a}", &[("a", "x")], "more than once")]
    #[case("${a}", "${b}", &[("a", "x")], "not declared")]
    #[case("foo", "bar", &[("a", "x")], "not used")]
    #[case("${a}", "${a}", &[("a", "(")], "Cannot compile")]
    fn invalid_templates_are_rejected(
        #[case] before: &str,
        #[case] after: &str,
        #[case] declared: &[(&str, &str)],
        #[case] needle: &str,
    ) {
        let err = Replace::new(before, after, groups(declared), false, Glob::all()).unwrap_err();
        assert!(err.to_string().contains(needle), "got: {err}");
    }

    #[test]
    fn only_matching_utf8_files_are_rewritten() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("a.txt"), "foo").expect("write");
        std::fs::write(dir.path().join("b.md"), "foo").expect("write");
        std::fs::write(dir.path().join("c.txt"), [0xff, 0xfe, b'f']).expect("write");
        let paths = Glob::new(["*.txt"], Vec::<String>::new()).expect("glob");
        let replace = Replace::new("foo", "bar", BTreeMap::new(), false, paths).expect("valid");

        let (result, _) = run(&replace, dir.path(), false);
        result.expect("transform");
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).expect("read"), "bar");
        assert_eq!(std::fs::read_to_string(dir.path().join("b.md")).expect("read"), "foo");
        assert_eq!(std::fs::read(dir.path().join("c.txt")).expect("read"), vec![0xff, 0xfe, b'f']);
    }

    #[test]
    fn noop_fails_unless_ignored() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("a.txt"), "nothing numeric").expect("write");

        let (result, _) = run(&numbers(), dir.path(), false);
        assert!(matches!(result, Err(TransformError::Noop { .. })));

        let (result, console) = run(&numbers(), dir.path(), true);
        result.expect("ignored");
        assert_eq!(console.times_in_log(MessageKind::Warning, "Replacing"), 1);
    }

    #[test]
    fn reverse_round_trips_untransformed_content() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("file.txt"), "1\n42").expect("write");
        let forward = numbers();
        let backward = forward.reverse().expect("reversible");

        run(&forward, dir.path(), false).0.expect("forward");
        run(backward.as_ref(), dir.path(), false).0.expect("reverse");
        assert_eq!(std::fs::read_to_string(dir.path().join("file.txt")).expect("read"), "1\n42");
    }

    #[test]
    fn reverse_of_prefixed_content_loses_the_prefix() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("test.txt"), "1\nTRANSFORMED42").expect("write");
        let forward = numbers();
        let backward = forward.reverse().expect("reversible");

        run(&forward, dir.path(), false).0.expect("forward");
        run(backward.as_ref(), dir.path(), false).0.expect("reverse");
        assert_eq!(std::fs::read_to_string(dir.path().join("test.txt")).expect("read"), "1\n42");
    }

    #[test]
    fn reverse_fails_when_after_repeats_a_group() {
        let replace = Replace::new("${a}", "${a}${a}", groups(&[("a", "x")]), false, Glob::all())
            .expect("forward is valid");
        let err = replace.reverse().unwrap_err();
        assert!(matches!(err, TransformError::NotReversible { .. }));
    }
}
