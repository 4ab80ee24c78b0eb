pub mod init;
pub mod login;
pub mod preview;
pub mod report;
pub mod stats;
pub mod take;
pub mod validate;
