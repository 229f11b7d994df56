pub mod extract;
pub mod fetch;
pub mod history;
pub mod output;
