pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod scanner;

pub use desc_diff_common as common;
