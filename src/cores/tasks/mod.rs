pub mod registry;
pub mod task_controller;
