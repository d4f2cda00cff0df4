pub mod init;
pub mod opts;
pub mod run;
pub mod validate;
