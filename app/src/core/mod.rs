pub mod aggregate;
pub mod budget;
pub mod reading;
pub mod store;
pub mod time;
pub mod unit;
pub mod window;
