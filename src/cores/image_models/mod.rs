pub mod image_controller;
pub mod params;
pub mod registry;
pub mod shapers;
