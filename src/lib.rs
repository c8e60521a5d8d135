pub mod cli;
pub mod commands;
pub mod counting;
pub mod utils;
pub mod writers;
