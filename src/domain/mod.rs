// Domain layer: records and ports (interfaces). Adapters implement the ports.

pub mod model;
pub mod ports;
