pub mod calendar;
pub mod entries;
pub mod health;
pub mod journal;
pub mod moods;
pub mod quotes;
pub mod stats;
pub mod ws;
