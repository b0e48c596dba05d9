// ABOUTME: Minimal stylesheet reader that finds the selectors of rules hiding their elements.
// ABOUTME: Reads top-level style rules only; at-rule blocks are stepped over, unbalanced sheets rejected.

use thiserror::Error;

/// Errors that make a stylesheet unreadable as a whole.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StylesheetError {
    /// A `}` without an opening brace, or a block left open at the end.
    #[error("unbalanced braces at byte {0}")]
    Unbalanced(usize),

    /// A `/*` comment that never closes.
    #[error("unterminated comment")]
    UnterminatedComment,

    /// A quoted string that never closes.
    #[error("unterminated string at byte {0}")]
    UnterminatedString(usize),
}

// A single CSS property: "display: none"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

// A selector list and its declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    /// Value of the last declaration of `name`, as the cascade within one rule would pick.
    pub fn declaration(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    /// True if the rule sets `display: none` or `visibility: hidden`.
    pub fn hides(&self) -> bool {
        self.declaration("display")
            .is_some_and(|v| v.to_ascii_lowercase().contains("none"))
            || self
                .declaration("visibility")
                .is_some_and(|v| v.to_ascii_lowercase().contains("hidden"))
    }

    /// True for selectors naming pseudo-elements such as `::before` or `:after`.
    pub fn targets_pseudo_element(&self) -> bool {
        let s = self.selector.as_str();
        s.contains("::") || s.contains(":after") || s.contains(":before")
    }
}

/// Top-level style rules of a sheet, in order. Rules with an empty body are dropped.
///
/// `"@media print { .p { display: none } } .c, #d { display: none }"` yields a single
/// rule for `.c, #d`; the `@media` block is stepped over.
pub fn parse_stylesheet(input: &str) -> Result<Vec<Rule>, StylesheetError> {
    let css = strip_comments(input)?;
    let bytes = css.as_bytes();
    let mut rules = Vec::new();
    let mut prelude_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b';' => {
                // Statement at-rules such as @import end here.
                prelude_start = i + 1;
            }
            b'{' => {
                let end = matching_brace(bytes, i)?;
                let prelude = css[prelude_start..i].trim();
                if !prelude.is_empty() && !prelude.starts_with('@') {
                    let declarations = parse_declarations(&css[i + 1..end]);
                    if !declarations.is_empty() {
                        rules.push(Rule {
                            selector: prelude.to_string(),
                            declarations,
                        });
                    }
                }
                i = end;
                prelude_start = end + 1;
            }
            b'}' => return Err(StylesheetError::Unbalanced(i)),
            b'"' | b'\'' => i = string_end(bytes, i)?,
            _ => {}
        }
        i += 1;
    }

    Ok(rules)
}

/// Declarations of one rule body, in order. Pieces without a `name:` part are dropped.
///
/// `"Visibility : hidden ;display:none"` reads as `visibility` = `hidden`, `display` = `none`.
pub fn parse_declarations(body: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for piece in body.split(';') {
        let Some((name, value)) = piece.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        declarations.push(Declaration {
            name: name.to_ascii_lowercase(),
            value: value.trim().to_string(),
        });
    }
    declarations
}

/// Index of the `}` closing the block opened at `open`. Braces inside strings don't count.
fn matching_brace(bytes: &[u8], open: usize) -> Result<usize, StylesheetError> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            b'"' | b'\'' => i = string_end(bytes, i)?,
            _ => {}
        }
        i += 1;
    }
    Err(StylesheetError::Unbalanced(open))
}

/// Index of the quote closing the string opened at `start`, honoring backslash escapes.
fn string_end(bytes: &[u8], start: usize) -> Result<usize, StylesheetError> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b if b == quote => return Ok(i),
            _ => {}
        }
        i += 1;
    }
    Err(StylesheetError::UnterminatedString(start))
}

fn strip_comments(input: &str) -> Result<String, StylesheetError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return Err(StylesheetError::UnterminatedComment),
        }
    }
    out.push_str(rest);
    Ok(out)
}
