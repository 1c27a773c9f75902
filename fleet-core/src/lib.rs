#![deny(warnings)]
#![deny(rust_2018_idioms)]

mod distance;
mod domain;
mod error;
mod ports;
mod queries;

pub use distance::*;
pub use domain::*;
pub use error::*;
pub use ports::*;
pub use queries::*;
