pub mod constants;
pub mod db;
pub mod metric;
