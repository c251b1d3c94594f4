// Domain layer: entities, persistence port and first-run data. No I/O here.

pub mod model;
pub mod ports;
pub mod seed;
