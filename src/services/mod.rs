pub mod command_service;
pub mod shell_service;
