use super::ast::{MalformedInput, Query};
use super::lex::{tokenize, Listing, Token};

pub const MAX_RECURSION: u16 = 32;

/// Parses an already tokenized cell into a `Group` of its clauses.
pub fn parse(tokens: &[Token]) -> Result<Query, MalformedInput> {
    Query::munch_tokens(tokens, MAX_RECURSION)
}

/// Compiles the raw fragments of one prerequisite cell into a minified query.
pub fn compile<S: AsRef<str>>(fragments: &[S]) -> Result<Query, MalformedInput> {
    let tokens = tokenize(fragments)?;
    debug!("tokens:\n{}", Listing(&tokens));

    let query = parse(&tokens)?;
    Ok(query.minify())
}
