pub mod grammar;
pub mod parser;
pub mod source_location;
pub mod string_scanner;
pub mod string_tokenizer;
pub mod syntax_error;
pub mod tokenizer;
pub mod tokens;
