// Domain layer: cell/row/document models, the consumer-side channel map and the ports.

pub mod channel_map;
pub mod model;
pub mod ports;
