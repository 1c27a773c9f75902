#![deny(warnings)]
#![deny(rust_2018_idioms)]

use config::{Config, File};
use engine::Settings;

pub mod alerts;
pub mod helper;
pub mod live;

#[test]
fn development_settings_are_valid() {
    Config::builder()
        .add_source(File::with_name("config/development.yaml").required(true))
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap();
}

#[test]
fn production_settings_are_valid() {
    Config::builder()
        .add_source(File::with_name("config/production.yaml").required(true))
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap();
}
