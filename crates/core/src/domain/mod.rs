pub mod financial;
pub mod metrics;
pub mod news;
pub mod schedule;
pub mod vc;
