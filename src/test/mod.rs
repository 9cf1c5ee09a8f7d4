pub mod support;

mod image_models_test;
mod log_test;
mod resources_test;
