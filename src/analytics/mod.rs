/// Analytics over completion histories
///
/// Success rates, aggregate counters and weekly views. Like the domain
/// engine these are pure functions of their inputs and an explicit "today".

pub mod stats;
pub mod weekly;

pub use stats::*;
pub use weekly::*;
