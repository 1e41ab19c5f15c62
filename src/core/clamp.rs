//! Clamp-on-write helpers for the numeric draft fields.
//!
//! Every setter accepts either a typed value or free text from an input box. Text
//! that does not parse leaves the field as it was; anything that parses is bounded
//! into the field's domain instead of being rejected.

pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;
pub const DEFAULT_QUALITY: u8 = 80;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;

/// Raw input for a numeric field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldInput<T> {
    Value(T),
    Text(String),
}

impl<T> From<T> for FieldInput<T> {
    fn from(value: T) -> Self {
        FieldInput::Value(value)
    }
}

impl<T> FieldInput<T> {
    pub fn text(raw: impl Into<String>) -> Self {
        FieldInput::Text(raw.into())
    }
}

/// Integer parse that also accepts decimal text, truncated toward zero.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}

pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn integer_input(input: &FieldInput<i64>) -> Option<i64> {
    match input {
        FieldInput::Value(v) => Some(*v),
        FieldInput::Text(raw) => parse_integer(raw),
    }
}

pub fn clamp_quality(value: i64) -> u8 {
    value.clamp(MIN_QUALITY as i64, MAX_QUALITY as i64) as u8
}

pub fn clamp_scale(value: f64) -> f64 {
    value.clamp(MIN_SCALE, MAX_SCALE)
}

/// Highest selectable frame for a composition of `duration_in_frames` frames.
pub fn max_frame(duration_in_frames: u32) -> u32 {
    duration_in_frames.saturating_sub(1)
}

pub fn clamp_frame(value: i64, duration_in_frames: u32) -> u32 {
    value.clamp(0, max_frame(duration_in_frames) as i64) as u32
}

/// Bounds are normalised so an inverted pair still yields a value inside both.
pub fn clamp_concurrency(value: i64, min: u32, max: u32) -> u32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    value.clamp(lo as i64, hi as i64) as u32
}

pub fn apply_quality(current: u8, input: &FieldInput<i64>) -> u8 {
    integer_input(input).map(clamp_quality).unwrap_or(current)
}

pub fn apply_scale(current: f64, input: &FieldInput<f64>) -> f64 {
    let parsed = match input {
        FieldInput::Value(v) if v.is_finite() => Some(*v),
        FieldInput::Value(_) => None,
        FieldInput::Text(raw) => parse_float(raw),
    };
    parsed.map(clamp_scale).unwrap_or(current)
}

pub fn apply_frame(current: u32, input: &FieldInput<i64>, duration_in_frames: u32) -> u32 {
    integer_input(input)
        .map(|v| clamp_frame(v, duration_in_frames))
        .unwrap_or(current)
}

pub fn apply_concurrency(current: u32, input: &FieldInput<i64>, min: u32, max: u32) -> u32 {
    integer_input(input)
        .map(|v| clamp_concurrency(v, min, max))
        .unwrap_or(current)
}
