//! Domain services - Pure operations over domain values

pub mod command_parser;

pub use command_parser::CommandParser;
