pub mod health;
pub mod payment;
pub mod sales;

mod router;
pub use router::get_router;
