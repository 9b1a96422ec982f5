extern crate chrono;
extern crate clap;
extern crate libc;
extern crate users;

pub mod cli;
pub mod error;
pub mod format;
pub mod fs;
