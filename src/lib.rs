pub mod catalog;
pub mod config;
pub mod config_processors;
pub mod domain;
pub mod endpoints;
pub mod io;
pub mod logging;
pub mod similarity;
pub mod stopwatch;
pub mod store;
