mod common;
mod config_tests;
mod engine_tests;
mod resume_tests;
