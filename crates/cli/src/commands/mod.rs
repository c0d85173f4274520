pub mod ask;
pub mod doctor;
pub mod init;
pub mod models;
pub mod prompt;
pub mod serve;
