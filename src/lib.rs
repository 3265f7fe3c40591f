extern crate chrono;
extern crate uuid;
extern crate protobuf;
extern crate regex;

pub mod errors;
pub mod access;
pub mod storage;
mod validate;
