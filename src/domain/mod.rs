// Domain layer: bulletin payload model, lookup vocabulary and ports.

pub mod model;
pub mod ports;
pub mod vocabulary;
