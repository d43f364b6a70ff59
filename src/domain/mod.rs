// Domain layer: core models and ports (interfaces). No external dependencies beyond serde/clap derives.

pub mod model;
pub mod ports;
