pub mod parallel;
pub mod sequential;

pub use parallel::run_parallel;
pub use sequential::run_sequential;
