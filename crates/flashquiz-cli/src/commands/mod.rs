pub mod check;
pub mod init;
pub mod parse;
pub mod quiz;
