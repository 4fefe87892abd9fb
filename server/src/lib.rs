pub mod dashboard;
pub mod render;
pub mod routes;
pub mod server_state;
