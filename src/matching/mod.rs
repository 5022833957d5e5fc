pub mod decision;
pub mod mandal;
pub mod policy;
pub mod similarity;
pub mod village;

pub use decision::{decide, CandidateSet};
pub use mandal::MandalDetector;
pub use policy::MatchPolicy;
pub use similarity::{is_fuzzy_match, similarity, FUZZY_MATCH_THRESHOLD};
pub use village::VillageDetector;
