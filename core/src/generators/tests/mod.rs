mod generator_tests;
mod resolver_tests;
