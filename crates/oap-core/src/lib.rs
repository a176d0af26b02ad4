pub mod config;
pub mod content;
pub mod error;
pub mod generate;
pub mod notify;
pub mod openapi;
pub mod resolve;
pub mod rich_text;

pub use generate::generate;
