use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;

use super::time;
use super::unit::{DegreeCelsius, KiloWattHours, Lux, Percent, Watt};

/// Identity assigned by the origin store, used only for deduplication.
/// Pushes arrive in non-decreasing id order, which says nothing about
/// timestamp order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub struct ReadingId(pub i64);

/// One telemetry sample of the meter. Immutable once accepted.
///
/// Every measured field is optional: the origin delivers missing or
/// garbage values routinely, and absent is not zero. Consumers exclude
/// absent fields from aggregates instead of defaulting them.
#[derive(Debug, Clone)]
pub struct Reading {
    pub id: ReadingId,
    pub timestamp: Option<DateTime<Local>>,

    pub power: Option<Watt>,
    pub current: Option<f64>,
    pub voltage: Option<f64>,
    pub power_factor: Option<f64>,
    pub apparent_power: Option<f64>,
    pub reactive_power: Option<f64>,
    pub frequency: Option<f64>,

    pub energy_today: Option<KiloWattHours>,
    pub energy_month: Option<KiloWattHours>,
    pub energy_total: Option<KiloWattHours>,
    pub cost_today: Option<f64>,
    pub cost_month: Option<f64>,
    pub tariff_energy: Option<f64>,
    pub tariff_base: Option<f64>,

    pub temperature: Option<DegreeCelsius>,
    pub humidity: Option<Percent>,
    pub illuminance: Option<Lux>,
    pub pressure: Option<f64>,
    pub altitude: Option<f64>,
    pub rssi: Option<f64>,
}

impl Reading {
    /// A reading with no measured fields.
    pub fn new(id: ReadingId, timestamp: Option<DateTime<Local>>) -> Self {
        Reading {
            id,
            timestamp,
            power: None,
            current: None,
            voltage: None,
            power_factor: None,
            apparent_power: None,
            reactive_power: None,
            frequency: None,
            energy_today: None,
            energy_month: None,
            energy_total: None,
            cost_today: None,
            cost_month: None,
            tariff_energy: None,
            tariff_base: None,
            temperature: None,
            humidity: None,
            illuminance: None,
            pressure: None,
            altitude: None,
            rssi: None,
        }
    }
}

/// Wire form of a reading. The origin store is schemaless, so every
/// field except the id may be absent, a number, a string-wrapped number
/// or outright garbage.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReading {
    pub id: i64,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub power: Option<Value>,
    #[serde(default)]
    pub current: Option<Value>,
    #[serde(default)]
    pub voltage: Option<Value>,
    #[serde(default)]
    pub power_factor: Option<Value>,
    #[serde(default)]
    pub apparent_power: Option<Value>,
    #[serde(default)]
    pub reactive_power: Option<Value>,
    #[serde(default)]
    pub frequency: Option<Value>,
    #[serde(default)]
    pub energy_today: Option<Value>,
    #[serde(default)]
    pub energy_month: Option<Value>,
    #[serde(default)]
    pub energy_total: Option<Value>,
    #[serde(default)]
    pub cost_today: Option<Value>,
    #[serde(default)]
    pub cost_month: Option<Value>,
    #[serde(default)]
    pub tariff_energy: Option<Value>,
    #[serde(default)]
    pub tariff_base: Option<Value>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub humidity: Option<Value>,
    #[serde(default)]
    pub illuminance: Option<Value>,
    #[serde(default)]
    pub pressure: Option<Value>,
    #[serde(default)]
    pub altitude: Option<Value>,
    #[serde(default)]
    pub rssi: Option<Value>,
}

impl From<RawReading> for Reading {
    fn from(raw: RawReading) -> Self {
        Reading {
            id: ReadingId(raw.id),
            timestamp: parse_timestamp(&raw.timestamp),
            power: parse_number(&raw.power).map(Watt),
            current: parse_number(&raw.current),
            voltage: parse_number(&raw.voltage),
            power_factor: parse_number(&raw.power_factor),
            apparent_power: parse_number(&raw.apparent_power),
            reactive_power: parse_number(&raw.reactive_power),
            frequency: parse_number(&raw.frequency),
            energy_today: parse_number(&raw.energy_today).map(KiloWattHours),
            energy_month: parse_number(&raw.energy_month).map(KiloWattHours),
            energy_total: parse_number(&raw.energy_total).map(KiloWattHours),
            cost_today: parse_number(&raw.cost_today),
            cost_month: parse_number(&raw.cost_month),
            tariff_energy: parse_number(&raw.tariff_energy),
            tariff_base: parse_number(&raw.tariff_base),
            temperature: parse_number(&raw.temperature).map(DegreeCelsius),
            humidity: parse_number(&raw.humidity).map(Percent),
            illuminance: parse_number(&raw.illuminance).map(Lux),
            pressure: parse_number(&raw.pressure),
            altitude: parse_number(&raw.altitude),
            rssi: parse_number(&raw.rssi),
        }
    }
}

fn parse_number(value: &Option<Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn parse_timestamp(value: &Option<Value>) -> Option<DateTime<Local>> {
    match value {
        Some(Value::String(s)) => time::parse_timestamp(s),
        //numeric timestamps are unix epoch seconds
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.with_timezone(&Local)),
        _ => None,
    }
}
