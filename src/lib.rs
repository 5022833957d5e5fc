pub mod address;
pub mod error;
pub mod hierarchy;
pub mod matching;
pub mod models;
pub mod pipeline;
pub mod records;
pub mod service;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_fixtures;
