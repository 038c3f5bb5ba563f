pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod id;
pub mod lists;
pub mod storage;
pub mod vault;
