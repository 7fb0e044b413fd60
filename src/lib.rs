pub mod api;
pub mod ast;
pub mod error;
pub mod extensions;
pub mod io;
pub mod lexer;
pub mod parser;
pub mod utils;
pub mod writer;
mod serialization;

pub use api::{parse, parse_lines, parse_named, write, write_lines};
pub use ast::{
    GlobalSection, PreOrPostProject, PreOrPostSolution, ProjectNesting, ProjectReference,
    ProjectSection, SectionContent, SolutionFile, Version,
};
pub use error::SlnError;
