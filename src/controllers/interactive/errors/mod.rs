pub mod coordinator_error;
pub mod render_error;
