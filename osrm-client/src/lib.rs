#![deny(warnings)]
#![deny(rust_2018_idioms)]

mod client;
mod error;
mod models;

pub use client::*;
pub use error::*;
pub use models::*;
