pub mod frankfurter;

pub use frankfurter::FrankfurterClient;
