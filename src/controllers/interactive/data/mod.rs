pub mod frame_data;
pub mod job;
pub mod pending_input;
