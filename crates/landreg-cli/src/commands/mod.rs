pub mod config;
pub mod info;
pub mod register;
pub mod stack;
