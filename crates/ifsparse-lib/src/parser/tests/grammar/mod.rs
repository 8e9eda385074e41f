mod declarations_tests;
mod directives_tests;
mod expressions_tests;
mod sql_tests;
mod statements_tests;
