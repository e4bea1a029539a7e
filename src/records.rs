use crate::parser::{compile, MalformedInput, Prereq, Query};
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use thiserror::Error;

/// Tagged wire form of a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryJson {
    Group { queries: Vec<QueryJson> },
    Or { queries: Vec<QueryJson> },
    Course { name: String },
    Recommended { course: Box<QueryJson> },
    Coreq { course: Box<QueryJson> },
    Not { course: Box<QueryJson> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryJsonError {
    #[error("`recommended` must wrap a course, found `{0}`")]
    RecommendedShape(&'static str),
    #[error("`or` carries {0} queries, expected 2")]
    OrArity(usize),
}

impl QueryJson {
    fn kind(&self) -> &'static str {
        match self {
            QueryJson::Group { .. } => "group",
            QueryJson::Or { .. } => "or",
            QueryJson::Course { .. } => "course",
            QueryJson::Recommended { .. } => "recommended",
            QueryJson::Coreq { .. } => "coreq",
            QueryJson::Not { .. } => "not",
        }
    }
}

impl From<&Prereq> for QueryJson {
    fn from(prereq: &Prereq) -> Self {
        QueryJson::Course {
            name: prereq.name.clone(),
        }
    }
}

impl From<&Query> for QueryJson {
    fn from(query: &Query) -> Self {
        match query {
            Query::Group(queries) => QueryJson::Group {
                queries: queries.iter().map(QueryJson::from).collect(),
            },
            Query::Or { left, right } => QueryJson::Or {
                queries: vec![QueryJson::from(&**left), QueryJson::from(&**right)],
            },
            Query::Prereq(prereq) => QueryJson::from(prereq),
            Query::Recommended(prereq) => QueryJson::Recommended {
                course: Box::new(QueryJson::from(prereq)),
            },
            Query::Coreq(course) => QueryJson::Coreq {
                course: Box::new(QueryJson::from(&**course)),
            },
            Query::Not(course) => QueryJson::Not {
                course: Box::new(QueryJson::from(&**course)),
            },
        }
    }
}

impl TryFrom<QueryJson> for Query {
    type Error = QueryJsonError;

    fn try_from(json: QueryJson) -> Result<Self, Self::Error> {
        let query = match json {
            QueryJson::Group { queries } => Query::Group(
                queries
                    .into_iter()
                    .map(Query::try_from)
                    .collect::<Result<Vec<Query>, QueryJsonError>>()?,
            ),
            QueryJson::Or { queries } => {
                let [left, right] = <[QueryJson; 2]>::try_from(queries)
                    .map_err(|queries| QueryJsonError::OrArity(queries.len()))?;
                Query::or(Query::try_from(left)?, Query::try_from(right)?)
            }
            QueryJson::Course { name } => Query::Prereq(Prereq { name }),
            QueryJson::Recommended { course } => match *course {
                QueryJson::Course { name } => Query::Recommended(Prereq { name }),
                other => return Err(QueryJsonError::RecommendedShape(other.kind())),
            },
            QueryJson::Coreq { course } => Query::coreq(Query::try_from(*course)?),
            QueryJson::Not { course } => Query::not(Query::try_from(*course)?),
        };

        Ok(query)
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        QueryJson::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = QueryJson::deserialize(deserializer)?;
        Query::try_from(json).map_err(de::Error::custom)
    }
}

/// Reads JSON written by this crate. `OR` chains fold to the left, so a long
/// list of alternatives nests deeper than serde_json allows by default.
pub fn from_json_str<T: DeserializeOwned>(s: &str) -> serde_json::Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(s);
    deserializer.disable_recursion_limit();

    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// One course as handed over by the catalog scraper: the prerequisite cell is
/// still the list of text fragments it was split into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub prereqs: Vec<String>,
}

impl CourseRecord {
    pub fn new<S: ToString>(name: S, title: S, prereqs: &[S]) -> Self {
        Self {
            name: name.to_string(),
            title: Some(title.to_string()),
            prereqs: prereqs.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn compile(&self) -> Result<CompiledCourse, MalformedInput> {
        Ok(CompiledCourse {
            name: self.name.clone(),
            title: self.title.clone().unwrap_or_default(),
            prereq_query: compile(self.prereqs.as_slice())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledCourse {
    pub name: String,
    pub title: String,
    pub prereq_query: Query,
}

impl CompiledCourse {
    pub fn matches<S: AsRef<str>>(&self, taken: &[S]) -> bool {
        self.prereq_query.matches(taken)
    }
}

impl Display for CompiledCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("--- {}: {} ---", self.name, self.title);
        write!(f, "{}\n{}", header, self.prereq_query.to_pretty_string())
    }
}

#[cfg(test)]
mod test_records {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_every_variant() {
        let query = Query::Group(vec![
            Query::or(Query::prereq("A"), Query::coreq(Query::prereq("B"))),
            Query::Recommended(Prereq::new("C")),
            Query::not(Query::Group(vec![Query::prereq("D")])),
        ]);

        assert_eq!(
            json!({
                "type": "group",
                "queries": [
                    {
                        "type": "or",
                        "queries": [
                            { "type": "course", "name": "A" },
                            { "type": "coreq", "course": { "type": "course", "name": "B" } }
                        ]
                    },
                    { "type": "recommended", "course": { "type": "course", "name": "C" } },
                    {
                        "type": "not",
                        "course": {
                            "type": "group",
                            "queries": [{ "type": "course", "name": "D" }]
                        }
                    }
                ]
            }),
            serde_json::to_value(&query).unwrap()
        );
    }

    #[test]
    fn deserialize_back() {
        let query = Query::Group(vec![
            Query::or(Query::prereq("A"), Query::coreq(Query::prereq("B"))),
            Query::Recommended(Prereq::new("C")),
        ]);
        let text = serde_json::to_string(&query).unwrap();
        assert_eq!(query, serde_json::from_str::<Query>(&text).unwrap());
    }

    #[test]
    fn long_or_chain_reads_back() {
        let mut fragments = vec!["A0".to_string()];
        for i in 1..70 {
            fragments.push("OR".to_string());
            fragments.push(format!("A{}", i));
        }
        let query = compile(fragments.as_slice()).unwrap();
        let text = serde_json::to_string(&query).unwrap();

        assert!(serde_json::from_str::<Query>(&text).is_err());
        assert_eq!(query, from_json_str::<Query>(&text).unwrap());
    }

    #[test]
    fn from_json_str_reads_courses() {
        let record = CourseRecord::new("CSE 46", "DATA STRC", &["A", "OR", "B", "coreq"]);
        let courses = vec![record.compile().unwrap()];
        let text = serde_json::to_string_pretty(&courses).unwrap();

        assert_eq!(courses, from_json_str::<Vec<CompiledCourse>>(&text).unwrap());
        assert!(from_json_str::<Query>("{\"type\": \"course\", \"name\": \"A\"} x").is_err());
    }

    #[test]
    fn deserialize_rejects_bad_shapes() {
        let recommended_or = json!({
            "type": "recommended",
            "course": { "type": "or", "queries": [] }
        });
        assert!(serde_json::from_value::<Query>(recommended_or).is_err());

        let lopsided_or = json!({
            "type": "or",
            "queries": [{ "type": "course", "name": "A" }]
        });
        let err = serde_json::from_value::<Query>(lopsided_or).unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn compiled_course_shape() {
        let record = CourseRecord::new("COMPSCI 161", "DES&ANALYS OF ALGOR", &["I&C SCI 46"]);
        let course = record.compile().unwrap();

        assert_eq!(
            json!({
                "name": "COMPSCI 161",
                "title": "DES&ANALYS OF ALGOR",
                "prereq_query": { "type": "course", "name": "I&C SCI 46" }
            }),
            serde_json::to_value(&course).unwrap()
        );
        assert!(course.matches(&["i&c sci 46"]));
    }

    #[test]
    fn compile_reports_malformed() {
        let record = CourseRecord::new("CSE 46", "DATA STRC IMPL&ANLS", &["OR", "A"]);
        assert!(record.compile().is_err());
    }

    #[test]
    fn display_block() {
        let record = CourseRecord::new("CSE 46", "DATA STRC IMPL&ANLS", &["A", "AND", "B"]);
        assert_eq!(
            "--- CSE 46: DATA STRC IMPL&ANLS ---\n(\n  |A|\nAND\n  |B|\n)",
            record.compile().unwrap().to_string()
        );
    }
}
