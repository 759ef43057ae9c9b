mod config;
pub use self::config::Config;

pub mod actions;
pub mod globals;
pub mod progressbar;
pub mod runner;

mod start;
pub use self::start::start;

mod commands;
mod dispatch;
