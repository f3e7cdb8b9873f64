pub mod entries;
pub mod import;
pub mod init;
pub mod passwd;
