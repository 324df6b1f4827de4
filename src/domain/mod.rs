// Domain layer: plain data models and the ports the components read from.

pub mod model;
pub mod ports;
