//! Vendor error codes reported on the `ERROR_CODE` data point.

use crate::{codec::Codec, dps::RawValue, value::LogicalValue};

pub const NO_ERROR: &str = "no_error";

struct Fault {
    raw: FaultCode,
    name: &'static str,
    message: &'static str,
}

enum FaultCode {
    Num(i64),
    Text(&'static str),
}

const fn num(raw: i64, name: &'static str, message: &'static str) -> Fault {
    Fault { raw: FaultCode::Num(raw), name, message }
}

const fn text(raw: &'static str, name: &'static str, message: &'static str) -> Fault {
    Fault { raw: FaultCode::Text(raw), name, message }
}

const FAULTS: &[Fault] = &[
    num(0, NO_ERROR, "No error"),
    text("no_error", NO_ERROR, "No error"),
    num(1, "front_bumper_stuck", "Front bumper stuck"),
    num(2, "wheel_stuck", "Wheel stuck"),
    num(3, "side_brush", "Side brush"),
    num(4, "rolling_brush_stuck", "Rolling brush bar stuck"),
    num(5, "device_trapped", "Device trapped"),
    num(6, "device_trapped", "Device trapped"),
    num(7, "wheel_suspended", "Wheel suspended"),
    num(8, "low_battery", "Low battery"),
    num(9, "magnetic_boundary", "Magnetic boundary"),
    num(12, "right_wall_sensor", "Right wall sensor"),
    num(13, "device_tilted", "Device tilted"),
    num(14, "insert_dust_collector", "Insert dust collector"),
    num(17, "restricted_area", "Restricted area detected"),
    num(18, "laser_cover_stuck", "Laser cover stuck"),
    num(19, "laser_sensor_stuck", "Laser sensor stuck"),
    num(20, "laser_sensor_blocked", "Laser sensor blocked"),
    num(21, "base_blocked", "Base blocked"),
    text("S1", "battery", "Battery"),
    text("S2", "wheel_module", "Wheel module"),
    text("S3", "side_brush", "Side brush"),
    text("S4", "suction_fan", "Suction fan"),
    text("S5", "rolling_brush", "Rolling brush"),
    text("S8", "path_tracking_sensor", "Path tracking sensor"),
    text("Wheel_stuck", "wheel_stuck", "Wheel stuck"),
    text("R_brush_stuck", "rolling_brush_stuck", "Rolling brush stuck"),
    text("Crash_bar_stuck", "front_bumper_stuck", "Front bumper stuck"),
    text("sensor_dirty", "sensor_dirty", "Sensor dirty"),
    text("N_enough_pow", "low_battery", "Low battery"),
    text("Stuck_5_min", "device_trapped", "Device trapped"),
    text("Fan_stuck", "fan_stuck", "Fan stuck"),
    text("S_brush_stuck", "side_brush_stuck", "Side brush stuck"),
];

impl FaultCode {
    fn to_raw(&self) -> RawValue {
        match self {
            Self::Num(n) => RawValue::Int(*n),
            Self::Text(s) => RawValue::Str((*s).to_string()),
        }
    }
}

/// Default codec for `ERROR_CODE`: every catalogued fault as an enum entry.
pub fn codec() -> Codec {
    Codec::table(FAULTS.iter().map(|f| (f.name, f.raw.to_raw())))
}

/// Human-readable message for a decoded error value.
pub fn message(value: &LogicalValue) -> Option<&'static str> {
    match value {
        LogicalValue::Choice(name) => {
            FAULTS.iter().find(|f| f.name == name.as_str()).map(|f| f.message)
        }
        LogicalValue::Text(text) => FAULTS
            .iter()
            .find(|f| {
                matches!(f.raw, FaultCode::Text(t) if t == text.as_str()) || f.name == text.as_str()
            })
            .map(|f| f.message),
        LogicalValue::Int(n) => {
            FAULTS.iter().find(|f| matches!(f.raw, FaultCode::Num(c) if c == *n)).map(|f| f.message)
        }
        _ => None,
    }
}

/// Whether a decoded error value reports an actual fault. Zero, empty and
/// `no_error` values do not.
pub fn is_fault(value: &LogicalValue) -> bool {
    match value {
        LogicalValue::Choice(name) => name != NO_ERROR,
        LogicalValue::Text(text) => !matches!(text.as_str(), "" | "0" | NO_ERROR),
        LogicalValue::Int(n) => *n != 0,
        LogicalValue::Bool(b) => *b,
        LogicalValue::Unknown(raw) => match raw {
            RawValue::Bool(b) => *b,
            RawValue::Int(n) => *n != 0,
            RawValue::Str(s) => !matches!(s.as_str(), "" | "0" | NO_ERROR),
            RawValue::Other(v) => !v.is_null(),
        },
        LogicalValue::Consumables(_) | LogicalValue::Rooms(_) => false,
    }
}
