pub mod attribution;
pub mod inference;
pub mod orchestrator;
pub mod window;
