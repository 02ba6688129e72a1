mod common;
mod scanner_tests;
