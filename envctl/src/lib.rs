pub mod assemble;
pub mod commands;
pub mod entry;
pub mod logging;
pub mod passthrough;
