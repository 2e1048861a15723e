//! A fully assembled kubectl command line.
//!
//! The command line is handed to the platform shell as one string, so every
//! token is rendered to shell text first. Most tokens are emitted verbatim;
//! values that have to survive a shell round-trip untouched (patch bodies,
//! annotation pairs, redirect targets) are encoded explicitly.

use std::collections::BTreeMap;
use std::fmt;

/// One element of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Emitted as-is. Shell metacharacters keep their meaning.
    Literal(String),
    /// Quoted with `shell_words::quote` so the shell hands it back unchanged.
    Escaped(String),
    /// An annotation `key=value` pair, emitted as `'key'='value'`.
    Annotation { key: String, value: String },
}

impl Token {
    /// Shell text for this token.
    pub fn render(&self) -> String {
        match self {
            Token::Literal(s) => s.clone(),
            Token::Escaped(s) => shell_words::quote(s).into_owned(),
            Token::Annotation { key, value } => {
                format!("{}={}", single_quote(key), single_quote(value))
            }
        }
    }
}

/// Wrap in single quotes unconditionally, splicing embedded quotes as `'\''`.
fn single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token::Literal(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token::Literal(s)
    }
}

/// An immutable command line plus environment overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    tokens: Vec<Token>,
    env: BTreeMap<String, String>,
}

impl Invocation {
    pub fn new(tokens: Vec<Token>, env: BTreeMap<String, String>) -> Self {
        Self { tokens, env }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Rendered tokens, in order.
    pub fn argv(&self) -> Vec<String> {
        self.tokens.iter().map(Token::render).collect()
    }

    /// The string passed to the shell: rendered tokens joined by single spaces.
    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }

    /// Variables set on top of the inherited environment.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// True if `args` appears as a contiguous run in `argv()`.
    pub fn contains_args(&self, args: &[&str]) -> bool {
        if args.is_empty() {
            return true;
        }
        let argv = self.argv();
        argv.windows(args.len()).any(|window| window.iter().zip(args).all(|(a, b)| a == b))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(tokens: Vec<Token>) -> Invocation {
        Invocation::new(tokens, BTreeMap::new())
    }

    #[test]
    fn literal_tokens_render_verbatim() {
        let inv = invocation(vec!["kubectl".into(), ">".into(), "/tmp/out".into()]);
        assert_eq!(inv.command_line(), "kubectl > /tmp/out");
    }

    #[test]
    fn escaped_token_survives_shell_splitting() {
        let patch = r#"{"data":{"key":"patched value"}}"#;
        let inv = invocation(vec!["-p".into(), Token::Escaped(patch.to_string())]);
        let words = shell_words::split(&inv.command_line()).unwrap();
        assert_eq!(words, vec!["-p".to_string(), patch.to_string()]);
    }

    #[test]
    fn annotation_token_is_single_quoted() {
        let token = Token::Annotation {
            key: "foo".to_string(),
            value: "bar".to_string(),
        };
        assert_eq!(token.render(), "'foo'='bar'");
    }

    #[test]
    fn annotation_token_with_embedded_quote_round_trips() {
        let token = Token::Annotation {
            key: "note".to_string(),
            value: "it's fine".to_string(),
        };
        let words = shell_words::split(&token.render()).unwrap();
        assert_eq!(words, vec!["note=it's fine".to_string()]);
    }

    #[test]
    fn contains_args_matches_contiguous_runs() {
        let inv = invocation(vec![
            "kubectl".into(),
            "--kubeconfig".into(),
            "/cfg".into(),
            "get".into(),
        ]);
        assert!(inv.contains_args(&["--kubeconfig", "/cfg"]));
        assert!(!inv.contains_args(&["kubectl", "get"]));
        assert!(inv.contains_args(&[]));
    }

    #[test]
    fn display_is_command_line() {
        let inv = invocation(vec!["a".into(), "b".into()]);
        assert_eq!(inv.to_string(), "a b");
    }
}
