pub mod athlete;
pub mod combined_event;
pub mod competition;
pub mod discipline;
pub mod performance;

pub use athlete::Athlete;
pub use combined_event::{Aggregate, CombinedEvent, CombinedEventResult};
pub use competition::Competition;
pub use discipline::{Discipline, DisciplineKind, EventType, Gender, UnknownCodeError};
pub use performance::{Performance, PerformanceError};
