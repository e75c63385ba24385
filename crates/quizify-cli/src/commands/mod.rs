pub mod compare;
pub mod grade;
pub mod init;
pub mod render;
pub mod retry;
pub mod segment;
pub mod validate;
