pub mod db;
#[cfg(test)]
pub mod memory;

pub use db::connect_to_mongo;
