use crate::parser::MalformedInput;
use crate::records::{CompiledCourse, CourseRecord};
use std::fmt;

/// A course whose prerequisite cell could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub name: String,
    pub error: MalformedInput,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.error)
    }
}

/// Compiled courses of one or more departments. Built once from records and
/// never changed afterwards; refreshing means building a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    courses: Vec<CompiledCourse>,
    failures: Vec<Failure>,
}

impl Catalog {
    /// Compiles every record on its own. A malformed record is logged and
    /// recorded as a failure, the rest of the batch still compiles.
    pub fn compile<I: IntoIterator<Item = CourseRecord>>(records: I) -> Self {
        let mut courses = vec![];
        let mut failures = vec![];

        for record in records {
            match record.compile() {
                Ok(course) => {
                    debug!("{}: {}", course.name, course.prereq_query);
                    courses.push(course);
                }
                Err(error) => {
                    warn!("skipping {}: {}", record.name, error);
                    failures.push(Failure {
                        name: record.name,
                        error,
                    });
                }
            }
        }

        Self { courses, failures }
    }

    /// Appends `other` after the courses of `self`.
    pub fn merge(mut self, other: Catalog) -> Self {
        self.courses.extend(other.courses);
        self.failures.extend(other.failures);
        self
    }

    pub fn courses(&self) -> &[CompiledCourse] {
        &self.courses
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Courses someone who completed `taken` can enroll in and has not already
    /// taken. With nothing taken every course is listed.
    pub fn eligible<S: AsRef<str>>(&self, taken: &[S]) -> Vec<&CompiledCourse> {
        if taken.is_empty() {
            return self.courses.iter().collect();
        }

        self.courses
            .iter()
            .filter(|course| {
                let name = course.name.to_lowercase();
                !taken.iter().any(|t| t.as_ref().to_lowercase() == name)
            })
            .filter(|course| course.matches(taken))
            .collect()
    }
}

impl FromIterator<CourseRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = CourseRecord>>(records: I) -> Self {
        Catalog::compile(records)
    }
}

#[cfg(test)]
mod test_catalog {
    use super::*;
    use crate::utils::parse_taken;

    fn department() -> Vec<CourseRecord> {
        vec![
            CourseRecord::new("I&C SCI 31", "INTRO TO PROGRAMMING", &[]),
            CourseRecord::new("I&C SCI 32", "PROG SOFTWARE LIBRARIES", &["I&C SCI 31"]),
            CourseRecord::new(
                "I&C SCI 33",
                "INTERMEDIATE PROGRAMMING",
                &["I&C SCI 32", "AND", "(", "MATH 2A", "OR", "MATH 5A", ")"],
            ),
            CourseRecord::new("I&C SCI 45C", "PROGRAMMING IN C/C++", &["I&C SCI 33", "coreq"]),
            CourseRecord::new("I&C SCI 90", "NEW STUDENTS SEMINAR", &["OR", "I&C SCI 31"]),
        ]
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let catalog = Catalog::compile(department());
        assert_eq!(4, catalog.len());
        assert_eq!(1, catalog.failures().len());
        assert_eq!("I&C SCI 90", catalog.failures()[0].name);
        assert!(matches!(
            catalog.failures()[0].error,
            MalformedInput::MissingOperand { .. }
        ));
    }

    #[test]
    fn merge_keeps_order() {
        let ics: Catalog = department().into_iter().collect();
        let cse = Catalog::compile(vec![CourseRecord::new(
            "CSE 46",
            "DATA STRC",
            &["I&C SCI 45C"],
        )]);
        let merged = ics.merge(cse);

        let names: Vec<&str> = merged.courses().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            vec!["I&C SCI 31", "I&C SCI 32", "I&C SCI 33", "I&C SCI 45C", "CSE 46"],
            names
        );
        assert_eq!(1, merged.failures().len());
    }

    #[test]
    fn eligible_courses() {
        let catalog = Catalog::compile(department());

        let names = |taken: &str| -> Vec<String> {
            catalog
                .eligible(parse_taken(taken).as_slice())
                .iter()
                .map(|c| c.name.clone())
                .collect()
        };

        assert_eq!(4, names("").len());
        // no prerequisites, and a corequisite only
        assert_eq!(vec!["I&C SCI 31", "I&C SCI 45C"], names("physics 7c"));
        assert_eq!(vec!["I&C SCI 32", "I&C SCI 45C"], names("ics 31"));
        assert_eq!(
            vec!["I&C SCI 33", "I&C SCI 45C"],
            names("ICS 31, ics 32, math 5a")
        );
    }
}
