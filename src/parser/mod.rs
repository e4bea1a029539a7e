/*
Turns the loosely written prerequisite text of a catalog into a query tree:
fragments are tokenized (lex), folded into a tree (ast) and minified (expr).
*/

pub mod ast;
pub mod expr;
pub mod lex;

pub use ast::{MalformedInput, Prereq, Query};
pub use expr::{compile, parse, MAX_RECURSION};
pub use lex::{tokenize, Token};
