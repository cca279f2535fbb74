mod degree_celsius;
mod kwh;
mod light;
mod percent;
mod watt;

pub use degree_celsius::DegreeCelsius;
pub use kwh::KiloWattHours;
pub use light::Lux;
pub use percent::Percent;
pub use watt::Watt;
