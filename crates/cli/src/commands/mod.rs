pub mod accounts;
pub mod call;
pub mod config;
pub mod deploy;
pub mod error;
pub mod init;
pub mod network;
