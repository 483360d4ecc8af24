pub mod post_model;
pub mod post_service;
pub mod post_store;
