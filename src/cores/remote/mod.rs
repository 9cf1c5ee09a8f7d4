pub mod gradio;
pub mod protocol;
pub mod remote_controller;
