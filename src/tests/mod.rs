#[cfg(test)]
mod common;


#[cfg(test)]
mod searcher_test;
