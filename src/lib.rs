pub mod lox;
