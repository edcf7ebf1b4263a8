pub mod dto;
pub mod http_gateway;

pub use http_gateway::HttpGateway;
