pub mod charts;
pub mod dates;
pub mod export;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod stats;
pub mod table;
