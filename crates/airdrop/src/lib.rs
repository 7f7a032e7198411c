pub mod domain;
pub mod infra;
mod run;

pub use run::start;
