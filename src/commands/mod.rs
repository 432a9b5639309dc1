pub mod enable;

pub use enable::{run, EnableOptions, Outcome, DEFAULT_HELPER};
