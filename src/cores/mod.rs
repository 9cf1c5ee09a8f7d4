pub mod image_models;
pub mod remote;
pub mod resources;
pub mod tasks;
