//! CLI subcommand implementations for the recipe-import binary.

pub mod doctor;
pub mod import_cmd;
pub mod login_cmd;
pub mod output;
pub mod serve;
