#[cfg(test)]
pub mod memory;
pub mod notify;
pub mod postgres;
