pub mod dto;
pub mod http_tmdb;

pub use http_tmdb::TmdbClient;
