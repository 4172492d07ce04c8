mod common;

mod submit_tests;
