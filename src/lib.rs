pub mod bot;
pub mod config;
pub mod discord;
pub mod error;
pub mod openai;
pub mod persona;
pub mod platform;
pub mod responder;
pub mod schedule;
pub mod types;

pub use bot::run;
