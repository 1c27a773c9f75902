mod alert;
mod event;
mod route;
mod tracking;
mod vehicles;

pub use alert::*;
pub use event::*;
pub use route::*;
pub use tracking::*;
pub use vehicles::*;
