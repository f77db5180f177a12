pub mod btle;
pub mod constants;
pub mod locator;
pub mod stack;
pub mod types;
