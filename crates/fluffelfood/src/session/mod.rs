mod run_log;

pub use run_log::*;
