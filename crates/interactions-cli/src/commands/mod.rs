pub mod demo;
pub mod make;
