pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod label_source;
pub mod pipeline;
pub mod scanner;
