pub mod admin_name;
pub mod normalizer;
pub mod phonetic;

pub use normalizer::{extract_tokens, normalize};
pub use phonetic::{fold_normalized, phonetic_fold};
