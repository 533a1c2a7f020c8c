mod common;
mod plan_tests;
mod run_tests;
