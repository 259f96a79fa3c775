pub mod athletes;
pub mod combined_events;
pub mod competitions;
