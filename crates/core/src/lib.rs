#![forbid(unsafe_code)]

pub mod bank;
pub mod content;
pub mod daily;
pub mod game;
pub mod model;
pub mod rules;
pub mod time;
pub mod wheel;

pub use time::Clock;
