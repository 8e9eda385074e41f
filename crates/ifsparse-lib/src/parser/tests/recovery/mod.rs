mod case_tests;
mod nesting_tests;
mod statements_tests;
mod unclosed_tests;
