pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod mutation;
pub mod utils;
