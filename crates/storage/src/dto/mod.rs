pub mod athlete;
pub mod combined_event;
pub mod competition;
