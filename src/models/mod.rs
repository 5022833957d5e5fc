pub mod hierarchy;
pub mod parse_result;
pub mod verdict;

pub use hierarchy::{District, Mandal, NameKey, Village};
pub use parse_result::{LocatedParseResult, ParseResult};
pub use verdict::{AdminLevel, DetectionStatus, DetectionVerdict};
