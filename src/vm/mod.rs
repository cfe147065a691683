pub mod bridge;
pub mod screen;
