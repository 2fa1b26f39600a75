pub mod core_math;
pub mod display;
pub mod error;
pub mod price_calcs;
