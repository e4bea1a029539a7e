use regex::Regex;
use std::{fmt, sync::LazyLock};

use super::ast::MalformedInput;
use crate::utils::normalize;

static GRADE_MINIMUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)grade = c").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Group(Vec<Token>),
}

impl Token {
    pub fn text<S: ToString>(s: S) -> Self {
        Token::Text(s.to_string())
    }
}

/// What a single raw fragment means to the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment {
    Open,
    Close,
    Noise,
    Annotation,
    Text,
}

impl Fragment {
    fn classify(s: &str) -> Self {
        if s == "(" {
            Fragment::Open
        } else if s == ")" {
            Fragment::Close
        } else if GRADE_MINIMUM.is_match(s) || s.contains("min ") {
            Fragment::Noise
        } else if s.contains("NO REPEATS ALLOWED") || s.contains("LOWER DIVISION WRITING") {
            // trails the token it annotates
            Fragment::Annotation
        } else {
            Fragment::Text
        }
    }
}

/// Groups raw fragments into tokens, turning each `(` ... `)` run into a
/// nested [`Token::Group`].
///
/// The close bracket for an open one is the next `)` fragment, not the one
/// at the same depth, so `( A ( B ) C )` is rejected.
pub fn tokenize<S: AsRef<str>>(fragments: &[S]) -> Result<Vec<Token>, MalformedInput> {
    let mut tokens = vec![];
    let mut index = 0;

    while let Some(fragment) = fragments.get(index) {
        let fragment = fragment.as_ref();
        match Fragment::classify(fragment) {
            Fragment::Open => {
                let end = fragments[index..]
                    .iter()
                    .position(|s| s.as_ref() == ")")
                    .map(|offset| index + offset)
                    .ok_or(MalformedInput::UnclosedOpen)?;

                let nested = tokenize(&fragments[index + 1..end])?;
                tokens.push(Token::Group(nested));
                index = end;
            }
            Fragment::Close => return Err(MalformedInput::DanglingClose),
            Fragment::Noise => debug!("dropping fragment {:?}", fragment),
            Fragment::Annotation => {
                if tokens.pop().is_none() {
                    return Err(MalformedInput::MissingOperand {
                        token: normalize(fragment),
                        action: "annotate",
                    });
                }
            }
            Fragment::Text => tokens.push(Token::Text(normalize(fragment))),
        }

        index += 1;
    }

    Ok(tokens)
}

/// Indented one-token-per-line rendering of a token list.
pub struct Listing<'a>(pub &'a [Token]);

impl Listing<'_> {
    fn write_indented(tokens: &[Token], indent: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in tokens {
            match token {
                Token::Group(nested) => Self::write_indented(nested, &format!("{}  ", indent), f)?,
                Token::Text(text) => writeln!(f, "{}{}", indent, text)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_indented(self.0, "", f)
    }
}
