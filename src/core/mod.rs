pub mod actions;
pub mod data;
pub mod engine;
pub mod formula;
pub mod newton;
pub mod tiles;
pub mod view;
