// Domain layer: report models, GraphQL wire types and the fetch port.

pub mod model;
pub mod ports;
