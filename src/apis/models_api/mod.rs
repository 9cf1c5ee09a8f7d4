pub mod image;
pub mod schemas;
pub mod status;
pub mod tasks;
pub mod validation;
