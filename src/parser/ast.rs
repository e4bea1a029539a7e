use super::expr::MAX_RECURSION;
use super::lex::Token;
use std::fmt;
use thiserror::Error;

/// A leaf naming a course, or whatever literal requirement text the catalog
/// put in its place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prereq {
    pub name: String,
}

impl Prereq {
    pub fn new<S: ToString>(name: S) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Every child must hold.
    Group(Vec<Query>),
    Or { left: Box<Query>, right: Box<Query> },
    Prereq(Prereq),
    Recommended(Prereq),
    Coreq(Box<Query>),
    Not(Box<Query>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInput {
    #[error("malformed input: `)` without a matching `(`")]
    DanglingClose,
    #[error("malformed input: `(` is never closed")]
    UnclosedOpen,
    #[error("malformed input: nothing before `{token}` to {action}")]
    MissingOperand { token: String, action: &'static str },
    #[error("malformed input: nothing after `{token}` to {action}")]
    MissingNext { token: String, action: &'static str },
    #[error("malformed input: `{token}` cannot {action} a `{shape}`")]
    UnsupportedShape {
        token: String,
        action: &'static str,
        shape: &'static str,
    },
    #[error("malformed input: expression nested deeper than {0} levels")]
    TooDeep(u16),
}

impl Query {
    pub fn prereq<S: ToString>(name: S) -> Self {
        Query::Prereq(Prereq::new(name))
    }

    pub fn or(left: Query, right: Query) -> Self {
        Query::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn coreq(course: Query) -> Self {
        Query::Coreq(Box::new(course))
    }

    pub fn not(course: Query) -> Self {
        Query::Not(Box::new(course))
    }

    /// The tag this variant carries in its serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Group(_) => "group",
            Query::Or { .. } => "or",
            Query::Prereq(_) => "course",
            Query::Recommended(_) => "recommended",
            Query::Coreq(_) => "coreq",
            Query::Not(_) => "not",
        }
    }

    /// Parses one level of tokens into a `Group` of its clauses. Clauses are
    /// folded strictly left to right: `OR` takes the single clause before it
    /// and the single token after it, so `A OR B AND C` is `[ A OR B, C ]`.
    pub(crate) fn munch_tokens(tokens: &[Token], depth: u16) -> Result<Self, MalformedInput> {
        if depth == 0 {
            return Err(MalformedInput::TooDeep(MAX_RECURSION));
        }

        let mut query: Vec<Query> = Vec::with_capacity(tokens.len());
        let mut tokens = tokens.iter();

        while let Some(token) = tokens.next() {
            let text = match token {
                Token::Group(nested) => {
                    query.push(Self::munch_tokens(nested, depth - 1)?);
                    continue;
                }
                Token::Text(text) => text.as_str(),
            };

            if text == "AND" {
                continue;
            } else if text.contains("recommended") {
                match query.pop() {
                    Some(Query::Prereq(prereq)) => query.push(Query::Recommended(prereq)),
                    Some(other) => return Err(unsupported(text, "recommend", &other)),
                    None => return Err(missing_operand(text, "recommend")),
                }
            } else if text.contains("coreq") {
                let last = query
                    .pop()
                    .ok_or_else(|| missing_operand(text, "mark as corequisite"))?;
                query.push(last.into_coreq(text)?);
            } else if text.contains("NO") {
                let next = tokens.next().ok_or_else(|| MalformedInput::MissingNext {
                    token: text.to_string(),
                    action: "negate",
                })?;
                let negated = Self::operand(next, depth)?.minify();
                query.push(Query::not(negated));
            } else if text == "OR" {
                let left = query
                    .pop()
                    .ok_or_else(|| missing_operand(text, "use as left side of OR"))?;
                let next = tokens.next().ok_or_else(|| MalformedInput::MissingNext {
                    token: text.to_string(),
                    action: "use as right side of OR",
                })?;
                query.push(Query::or(left, Self::operand(next, depth)?));
            } else {
                query.push(Query::prereq(text));
            }
        }

        Ok(Query::Group(query))
    }

    fn operand(token: &Token, depth: u16) -> Result<Self, MalformedInput> {
        match token {
            Token::Group(nested) => Self::munch_tokens(nested, depth - 1),
            Token::Text(text) => Ok(Query::prereq(text)),
        }
    }

    /// Marks the clause a `coreq` annotation trails as a corequisite. For a
    /// group that is its last element, for an `OR` its right side.
    fn into_coreq(self, token: &str) -> Result<Self, MalformedInput> {
        const ACTION: &str = "mark as corequisite";

        match self {
            Query::Prereq(prereq) => Ok(Query::coreq(Query::Prereq(prereq))),
            Query::Group(mut queries) => match queries.pop() {
                Some(Query::Prereq(prereq)) => {
                    queries.push(Query::coreq(Query::Prereq(prereq)));
                    Ok(Query::Group(queries))
                }
                Some(other) => Err(unsupported(token, ACTION, &other)),
                None => Err(missing_operand(token, ACTION)),
            },
            Query::Or { left, right } => match *right {
                Query::Prereq(prereq) => Ok(Query::Or {
                    left,
                    right: Box::new(Query::coreq(Query::Prereq(prereq))),
                }),
                other => Err(unsupported(token, ACTION, &other)),
            },
            other => Err(unsupported(token, ACTION, &other)),
        }
    }

    /// Replaces a single-child group with its child, repeatedly. Anything
    /// below a group with several children is left alone.
    pub fn minify(self) -> Self {
        match self {
            Query::Group(queries) => match <[Query; 1]>::try_from(queries) {
                Ok([only]) => only.minify(),
                Err(queries) => Query::Group(queries),
            },
            other => other,
        }
    }

    /// Whether `taken` (course names, compared case-insensitively) satisfies
    /// this query. Recommended courses and corequisites never block.
    pub fn matches<S: AsRef<str>>(&self, taken: &[S]) -> bool {
        match self {
            Query::Group(queries) => queries.iter().all(|q| q.matches(taken)),
            Query::Or { left, right } => left.matches(taken) || right.matches(taken),
            Query::Prereq(prereq) => {
                let name = prereq.name.to_lowercase();
                taken.iter().any(|t| t.as_ref().to_lowercase() == name)
            }
            Query::Recommended(_) | Query::Coreq(_) => true,
            Query::Not(course) => !course.matches(taken),
        }
    }

    /// Multi-line rendering: groups open a bracket and put each child on its
    /// own indented block, separated by `AND` lines.
    pub fn to_pretty_string(&self) -> String {
        self.pretty(String::new())
    }

    fn pretty(&self, indent: String) -> String {
        match self {
            Query::Group(queries) => {
                let inner = queries
                    .iter()
                    .map(|q| q.pretty(format!("{}  ", indent)))
                    .collect::<Vec<String>>()
                    .join(&format!("\n{}AND\n", indent));
                format!("{indent}(\n{inner}\n{indent})", indent = indent, inner = inner)
            }
            Query::Or { left, right } => format!(
                "{}{} OR {}",
                indent,
                left.pretty(String::new()),
                right.pretty(String::new())
            ),
            other => format!("{}{}", indent, other),
        }
    }

    // leaf name for a bare course, full rendering otherwise
    fn label(&self) -> String {
        match self {
            Query::Prereq(prereq) => prereq.name.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Group(queries) => {
                let inner = queries
                    .iter()
                    .map(|q| q.to_string())
                    .collect::<Vec<String>>()
                    .join(" AND ");
                write!(f, "[ {} ]", inner)
            }
            Query::Or { left, right } => write!(f, "{} OR {}", left, right),
            Query::Prereq(prereq) => write!(f, "|{}|", prereq.name),
            Query::Recommended(prereq) => write!(f, "|RECOMMENDED: {}|", prereq.name),
            Query::Coreq(course) => write!(f, "|COREQ: {}|", course.label()),
            Query::Not(course) => write!(f, "|NOT: {}|", course.label()),
        }
    }
}

fn missing_operand(token: &str, action: &'static str) -> MalformedInput {
    MalformedInput::MissingOperand {
        token: token.to_string(),
        action,
    }
}

fn unsupported(token: &str, action: &'static str, found: &Query) -> MalformedInput {
    MalformedInput::UnsupportedShape {
        token: token.to_string(),
        action,
        shape: found.kind(),
    }
}
