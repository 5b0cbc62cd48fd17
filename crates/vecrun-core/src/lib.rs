pub mod deps;
pub(crate) mod detect;
pub mod execution;
pub mod lifecycle;
pub mod models;
pub mod orchestration;
pub mod probe;
