//! Background jobs for board-service

pub mod archiver;

pub use archiver::start_archiver;
