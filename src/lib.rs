#[macro_use]
extern crate log;

pub mod catalog;
pub mod parser;
pub mod reader;
pub mod records;
pub mod utils;

pub use catalog::{Catalog, Failure};
pub use parser::{compile, parse, tokenize, MalformedInput, Prereq, Query, Token};
pub use reader::CatalogReader;
pub use records::{from_json_str, CompiledCourse, CourseRecord, QueryJson};
