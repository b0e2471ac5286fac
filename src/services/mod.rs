pub mod day_aggregator;
pub mod journal;
pub mod quotes;
pub mod trends;
pub mod vocabulary;
