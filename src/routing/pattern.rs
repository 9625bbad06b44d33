//! Path template compiler.
//!
//! # Responsibilities
//! - Parse templates such as `/r/{article:str}/{id:nat}` into segments
//! - Generate one anchored regex equivalent to the whole template
//! - Extract typed variables from a path that satisfies the regex
//!
//! # Design Decisions
//! - Literal segments are spliced in verbatim, so a literal segment may
//!   itself be a regex (`/pub/.*`)
//! - A placeholder spans from its opening `{` to the *last* `}` of the
//!   segment, so fragments with inner braces (`{f:\d{3}}`) stay whole
//! - Each placeholder is a named capture group; fragments with their own
//!   groups never shift variable positions
//! - Every error surfaces while compiling, never while matching

use regex::Regex;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::vars::{Value, VarKind, Vars};

/// One `/`-separated piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var { name: String, kind: VarKind },
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    regex: Regex,
    vars: Vec<(String, VarKind)>,
}

impl PathPattern {
    /// Compile `template`, inserting a leading `/` when it is missing.
    pub fn compile(template: &str) -> RouteResult<Self> {
        let template = if template.starts_with('/') {
            template.to_string()
        } else {
            format!("/{}", template)
        };

        let mut vars: Vec<(String, VarKind)> = Vec::new();
        let mut exp = String::from("^(?:");

        // The leading slash always yields an empty first piece.
        for raw in template.split('/').skip(1) {
            exp.push('/');
            match parse_segment(&template, raw)? {
                Segment::Literal(text) => exp.push_str(&text),
                Segment::Var { name, kind } => {
                    if vars.iter().any(|(existing, _)| *existing == name) {
                        return Err(RouteError::DuplicateVariable {
                            template: template.clone(),
                            name,
                        });
                    }
                    exp.push_str(&format!("(?P<{}>{})", group_name(vars.len()), kind.regex()));
                    vars.push((name, kind));
                }
            }
        }
        exp.push_str(")$");

        let regex = Regex::new(&exp).map_err(|source| RouteError::InvalidRegex {
            template: template.clone(),
            regex: exp.clone(),
            source,
        })?;

        Ok(Self {
            template,
            regex,
            vars,
        })
    }

    /// The normalized template, always starting with `/`.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The generated matching rule.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the template declares at least one placeholder.
    pub fn has_vars(&self) -> bool {
        !self.vars.is_empty()
    }

    /// Placeholder names and types, left to right.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &VarKind)> {
        self.vars.iter().map(|(name, kind)| (name.as_str(), kind))
    }

    /// Whether `path` satisfies the template in full.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Extract typed variables from `path`.
    ///
    /// Returns `None` when the path does not satisfy the template. A numeric
    /// capture that overflows its type is kept as [`Value::Raw`].
    pub fn extract(&self, path: &str) -> Option<Vars> {
        let caps = self.regex.captures(path)?;
        let mut vars = Vars::default();

        for (index, (name, kind)) in self.vars.iter().enumerate() {
            let raw = caps.name(&group_name(index)).map_or("", |m| m.as_str());
            let value = kind.convert(raw).unwrap_or_else(|| {
                tracing::warn!(
                    template = %self.template,
                    variable = %name,
                    value = %raw,
                    "Matched value does not fit its declared type"
                );
                Value::Raw(raw.to_string())
            });
            vars.push(name.clone(), raw, value);
        }

        Some(vars)
    }
}

fn group_name(index: usize) -> String {
    format!("__var{}", index)
}

/// Classify one template segment.
///
/// Anything opening with `{` must be a well-formed placeholder.
fn parse_segment(template: &str, segment: &str) -> RouteResult<Segment> {
    if !segment.starts_with('{') {
        return Ok(Segment::Literal(segment.to_string()));
    }

    let malformed = || RouteError::MalformedPlaceholder {
        template: template.to_string(),
        segment: segment.to_string(),
    };

    let inner = segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(malformed)?;
    let (name, spec) = inner.split_once(':').ok_or_else(malformed)?;

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    if name.is_empty() || !name.chars().all(is_word) || spec.is_empty() {
        return Err(malformed());
    }

    Ok(Segment::Var {
        name: name.to_string(),
        kind: VarKind::parse(spec),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(template: &str) -> PathPattern {
        PathPattern::compile(template).unwrap()
    }

    #[test]
    fn test_literal_matches_exactly() {
        let pattern = compile("/home/about");
        assert!(!pattern.has_vars());
        assert!(pattern.is_match("/home/about"));
        assert!(!pattern.is_match("/home/about/"));
        assert!(!pattern.is_match("/home"));
        assert!(!pattern.is_match("/x/home/about"));
        assert!(!pattern.is_match("/home/aboutx"));
    }

    #[test]
    fn test_root() {
        let pattern = compile("/");
        assert!(pattern.is_match("/"));
        assert!(!pattern.is_match("/a"));
        assert!(!pattern.is_match(""));
    }

    #[test]
    fn test_leading_slash_inserted() {
        let pattern = compile("lol");
        assert_eq!(pattern.template(), "/lol");
        assert!(pattern.is_match("/lol"));

        assert_eq!(compile("").template(), "/");
    }

    #[test]
    fn test_int_grammar() {
        let pattern = compile("/n/{v:int}");
        for ok in ["/n/0", "/n/-0", "/n/7", "/n/42", "/n/-32"] {
            assert!(pattern.is_match(ok), "{} should match", ok);
        }
        for bad in ["/n/007", "/n/01", "/n/-01", "/n/4a", "/n/", "/n/-", "/n/--1", "/n/+1"] {
            assert!(!pattern.is_match(bad), "{} should not match", bad);
        }
    }

    #[test]
    fn test_negative_zero() {
        let pattern = compile("/n/{v:int}");
        let vars = pattern.extract("/n/-0").unwrap();
        assert_eq!(vars.get("v"), Some(&Value::Int(0)));
        assert_eq!(vars.raw("v"), Some("-0"));

        assert!(!compile("/p/{v:nat}").is_match("/p/-0"));
    }

    #[test]
    fn test_nat_grammar() {
        let pattern = compile("/p/{age:nat}");
        assert!(pattern.is_match("/p/42"));
        assert!(pattern.is_match("/p/0"));
        assert!(!pattern.is_match("/p/-32"));
        assert!(!pattern.is_match("/p/007"));
        assert!(!pattern.is_match("/p/forty"));

        let vars = pattern.extract("/p/42").unwrap();
        assert_eq!(vars.get("age"), Some(&Value::Nat(42)));
    }

    #[test]
    fn test_str_grammar() {
        let pattern = compile("/r/{sub:str}");
        assert!(pattern.is_match("/r/rust_lang"));
        assert!(!pattern.is_match("/r/rust2"));
        assert!(!pattern.is_match("/r/rust-lang"));
        assert!(!pattern.is_match("/r/"));
    }

    #[test]
    fn test_extract_multiple() {
        let pattern = compile("/r/{article:str}/{id:nat}");
        let vars = pattern.extract("/r/news/15").unwrap();
        assert_eq!(vars.str("article"), Some("news"));
        assert_eq!(vars.nat("id"), Some(15));
        assert_eq!(
            pattern.variables().map(|(name, _)| name).collect::<Vec<_>>(),
            ["article", "id"]
        );
    }

    #[test]
    fn test_extract_rejects_non_matching() {
        let pattern = compile("/song/{id:int}");
        assert!(pattern.extract("/song/abc").is_none());
    }

    #[test]
    fn test_regex_placeholder_with_inner_braces() {
        let pattern = compile(r"/files/{file:\d{3}\.html}");
        assert!(pattern.has_vars());
        assert!(pattern.is_match("/files/123.html"));
        assert!(!pattern.is_match("/files/12.html"));

        let vars = pattern.extract("/files/404.html").unwrap();
        assert_eq!(vars.get("file"), Some(&Value::Raw("404.html".into())));
    }

    #[test]
    fn test_regex_placeholder_with_own_groups() {
        let pattern = compile(r"/v/{ver:(v)(\d+)}/{id:int}");
        let vars = pattern.extract("/v/v2/10").unwrap();
        assert_eq!(vars.str("ver"), Some("v2"));
        assert_eq!(vars.int("id"), Some(10));
    }

    #[test]
    fn test_regex_placeholder_alternation_is_scoped() {
        let pattern = compile("/f/{fmt:json|xml}/end");
        assert!(pattern.is_match("/f/json/end"));
        assert!(pattern.is_match("/f/xml/end"));
        assert!(!pattern.is_match("/f/json"));
    }

    #[test]
    fn test_literal_regex_segment() {
        let pattern = compile("/pub/.*");
        assert!(!pattern.has_vars());
        assert!(pattern.is_match("/pub/lisn/index.html"));
        assert!(!pattern.is_match("/private/x"));
    }

    #[test]
    fn test_multi_segment_capture_kept_whole() {
        let pattern = compile("/pub/{rest:.*}");
        let vars = pattern.extract("/pub/lisn/index.html").unwrap();
        assert_eq!(vars.str("rest"), Some("lisn/index.html"));
    }

    #[test]
    fn test_round_trip() {
        let template = "/r/{article:str}/x/{id:int}/{zero:int}/{file:[a-z]+\\.txt}";
        let pattern = compile(template);

        for path in ["/r/news/x/-15/0/notes.txt", "/r/news/x/7/-0/a.txt"] {
            let vars = pattern.extract(path).unwrap();
            let mut values = vars.iter_raw().map(|(_, raw)| raw);
            let rebuilt = pattern
                .template()
                .split('/')
                .map(|segment| {
                    if segment.starts_with('{') {
                        values.next().unwrap()
                    } else {
                        segment
                    }
                })
                .collect::<Vec<_>>()
                .join("/");
            assert_eq!(rebuilt, path);
        }
    }

    #[test]
    fn test_overflow_kept_raw() {
        let pattern = compile("/n/{v:int}");
        let vars = pattern.extract("/n/123456789012345678901234").unwrap();
        assert_eq!(
            vars.get("v"),
            Some(&Value::Raw("123456789012345678901234".into()))
        );
    }

    #[test]
    fn test_malformed_placeholders() {
        for template in ["/a/{id", "/a/{id:int", "/a/{:int}", "/a/{id:}", "/a/{id}", "/a/{i-d:int}"] {
            match PathPattern::compile(template) {
                Err(RouteError::MalformedPlaceholder { .. }) => {}
                other => panic!("{} should be malformed, got {:?}", template, other),
            }
        }
    }

    #[test]
    fn test_invalid_regex_fragment() {
        let err = PathPattern::compile("/a/{x:[0-9}").unwrap_err();
        assert!(matches!(err, RouteError::InvalidRegex { .. }));
    }

    #[test]
    fn test_duplicate_variable() {
        let err = PathPattern::compile("/{a:int}/{a:str}").unwrap_err();
        assert!(matches!(err, RouteError::DuplicateVariable { .. }));
    }
}
