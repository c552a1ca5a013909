// Presentation layer - One-way rendering of results
pub mod console;
