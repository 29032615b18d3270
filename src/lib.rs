pub mod checker;
pub mod formula;
pub mod parser;
pub mod schema;
pub mod script;
pub mod searcher;
pub mod substitution;
pub mod validator;

#[cfg(test)]
mod tests;
