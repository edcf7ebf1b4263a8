pub mod gateway;
pub mod tmdb;
