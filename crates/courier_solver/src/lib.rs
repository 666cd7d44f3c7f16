pub mod construction;
pub mod genetic;
pub mod graph;
pub mod hybrid;
pub mod json;
pub mod problem;
pub mod queue;
pub mod scheduler;
pub mod solution;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
