pub mod interactive;
pub mod render_once;
