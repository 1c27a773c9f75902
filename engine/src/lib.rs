#![deny(warnings)]
#![deny(rust_2018_idioms)]

use fleet_core::{AlertStorage, VehicleStorage};

mod alerts;
mod anomaly;
mod broker;
mod live;
mod registry;
mod settings;
mod simulation;
mod startup;

pub use alerts::*;
pub use anomaly::*;
pub use broker::*;
pub use live::*;
pub use registry::*;
pub use settings::*;
pub use simulation::*;
pub use startup::*;

/// Combined persistence requirement of the engine, satisfied by any
/// adapter implementing both storage ports.
pub trait Storage: VehicleStorage + AlertStorage + Send + Sync + 'static {}

impl<T> Storage for T where T: VehicleStorage + AlertStorage + Send + Sync + 'static {}
