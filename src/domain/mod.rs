// Domain layer: valuation models and ports (interfaces) to external collaborators.

pub mod model;
pub mod ports;
