pub mod config;
pub mod credentials;
pub mod history;
pub mod preset;
pub mod providers;
pub mod retention;
pub mod run;
pub mod schedule;
pub mod validate;
