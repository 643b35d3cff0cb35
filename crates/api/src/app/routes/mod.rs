pub mod common;
pub mod components;
pub mod logs;
pub mod stock;
pub mod system;
