pub mod core;
pub mod grade;
pub mod notice;
pub mod rows;
