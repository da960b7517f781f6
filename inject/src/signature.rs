//! Dependency discovery from provider declarations.
//!
//! A provider either carries an explicit list of dependency names or a
//! declaration string that looks like the provider's signature, for example
//! `"|config, /* optional */ logger|"`, `"fn connect(url: &str, pool_size: usize)"`
//! or, for constructible types, `"impl Repo { fn new(db: Rc<Db>) -> Self }"`.
//! The parser turns either form into an ordered list of [`DependencyRef`]s.

use crate::error::{Error, Result};
use crate::provider::{Provider, ProviderKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

// `/* optional */ name` becomes `name?` before comments are stripped.
static OPTIONAL_MARKER: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)/\*\s*optional\s*\*/\s*((?:mut\s+)?[A-Za-z_][A-Za-z0-9_]*)")
    .expect("Optional marker regex should be valid")
});

static COMMENTS: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").expect("Comment regex should be valid"));

// Best-effort: a `new(` inside a string literal earlier in the text will match first.
static CONSTRUCTOR: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"\bnew\s*(?:<[^()]*>\s*)?\(").expect("Constructor regex should be valid")
});

// Leading qualifiers such as `pub(crate) async` or `move`.
static QUALIFIERS: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r#"^(?:(?:pub(?:\s*\([^)]*\))?|async|move|unsafe|const|extern(?:\s+"[^"]*")?)\s+)+"#)
    .expect("Qualifier regex should be valid")
});

static BARE_IDENT: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*\??$").expect("Identifier regex should be valid"));

static PARAM: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^(?:mut\s+)?([A-Za-z_][A-Za-z0-9_]*)(\?)?").expect("Parameter regex should be valid")
});

/// One declared dependency: a name and whether its absence is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyRef {
  name: String,
  optional: bool,
}

impl DependencyRef {
  pub fn required(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: false,
    }
  }

  pub fn optional(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      optional: true,
    }
  }

  /// Reads an entry such as `"logger?"`; a single trailing `?` marks it optional.
  pub fn parse(entry: &str) -> Self {
    match entry.strip_suffix('?') {
      Some(name) => Self::optional(name),
      None => Self::required(entry),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_optional(&self) -> bool {
    self.optional
  }
}

impl fmt::Display for DependencyRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.optional {
      write!(f, "{}?", self.name)
    } else {
      f.write_str(&self.name)
    }
  }
}

/// Returns the ordered dependencies of `provider`.
///
/// An explicit list set with [`Provider::inject`] is used as is. Otherwise the
/// declaration text is scanned according to the provider's kind.
pub fn parse(provider: &Provider) -> Result<Vec<DependencyRef>> {
  if let Some(explicit) = provider.explicit_dependencies() {
    return Ok(explicit.iter().map(|entry| DependencyRef::parse(entry)).collect());
  }
  parse_declaration(provider.kind(), provider.declaration())
}

/// Scans declaration text for its parameter list.
pub fn parse_declaration(kind: ProviderKind, declaration: &str) -> Result<Vec<DependencyRef>> {
  let marked = OPTIONAL_MARKER.replace_all(declaration, "${1}?");
  let text = COMMENTS.replace_all(&marked, " ");

  let list = match kind {
    ProviderKind::Constructible => match CONSTRUCTOR.find(&text) {
      Some(m) => balanced_parens(&text, m.end() - 1),
      // A type without a constructor is built from nothing.
      None if !text.trim().is_empty() => Some(""),
      None => None,
    },
    ProviderKind::Callable => callable_list(&text),
  };

  let list = list.ok_or_else(|| Error::Parse {
    declaration: declaration.to_owned(),
  })?;

  Ok(split_params(list).filter_map(param_ref).collect())
}

fn callable_list(text: &str) -> Option<&str> {
  let trimmed = text.trim();
  let trimmed = match QUALIFIERS.find(trimmed) {
    Some(m) => &trimmed[m.end()..],
    None => trimmed,
  };
  if BARE_IDENT.is_match(trimmed) {
    return Some(trimmed);
  }

  let start = list_start(trimmed)?;
  if trimmed[start..].starts_with('(') {
    balanced_parens(trimmed, start)
  } else {
    let rest = &trimmed[start + 1..];
    rest.find('|').map(|end| &rest[..end])
  }
}

/// The first `(` or `|` outside of generics.
fn list_start(text: &str) -> Option<usize> {
  let mut angles = 0usize;
  let mut prev = '\0';
  for (idx, ch) in text.char_indices() {
    match ch {
      '<' => angles += 1,
      '>' if prev == '-' || prev == '=' => {}
      '>' => angles = angles.saturating_sub(1),
      '(' | '|' if angles == 0 => return Some(idx),
      _ => {}
    }
    prev = ch;
  }
  None
}

/// Returns the text between the `(` at `open` and its matching `)`.
fn balanced_parens(text: &str, open: usize) -> Option<&str> {
  let mut depth = 0usize;
  for (idx, ch) in text[open..].char_indices() {
    match ch {
      '(' => depth += 1,
      ')' => {
        depth -= 1;
        if depth == 0 {
          return Some(&text[open + 1..open + idx]);
        }
      }
      _ => {}
    }
  }
  None
}

/// Splits on commas that are not nested inside brackets or generics.
fn split_params(list: &str) -> impl Iterator<Item = &str> {
  let mut parts = Vec::new();
  let mut depth = 0usize;
  let mut start = 0;
  let mut prev = '\0';

  for (idx, ch) in list.char_indices() {
    match ch {
      '(' | '[' | '{' | '<' => depth += 1,
      // `->` and `=>` are arrows, not closing generics.
      '>' if prev == '-' || prev == '=' => {}
      ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
      ',' if depth == 0 => {
        parts.push(&list[start..idx]);
        start = idx + 1;
      }
      _ => {}
    }
    prev = ch;
  }
  parts.push(&list[start..]);

  parts.into_iter().map(str::trim).filter(|p| !p.is_empty())
}

fn param_ref(param: &str) -> Option<DependencyRef> {
  let mut rest = param.trim_start_matches('&').trim_start();
  if rest.starts_with('\'') {
    // `&'a self`
    rest = rest.split_once(char::is_whitespace).map_or("", |(_, tail)| tail.trim_start());
  }

  let caps = PARAM.captures(rest)?;
  let name = caps.get(1)?.as_str();
  if name == "self" {
    return None;
  }
  Some(DependencyRef {
    name: name.to_owned(),
    optional: caps.get(2).is_some(),
  })
}
