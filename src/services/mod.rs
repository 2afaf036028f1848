pub mod tripay;

pub use tripay::TripayClient;
