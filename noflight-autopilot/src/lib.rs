pub mod benchmark;
pub mod config;
pub mod protocol;
pub mod runner;
pub mod session;
pub mod util;
