pub mod error;
pub mod events;
pub mod film_search;
pub mod filter;
pub mod like_control;
pub mod list_collection;
pub mod moderation;
pub mod normalize;
pub mod ports;
pub mod user_admin;
