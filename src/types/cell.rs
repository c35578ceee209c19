use serde::{Deserialize, Serialize};

/// A single caller-supplied matrix entry.
///
/// Values are already computed upstream; the engine only formats them.
/// In JSON a fraction is written as a two-element array `[num, den]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Fraction(i64, i64),
    Text(String),
    #[default]
    Blank,
}

impl CellValue {
    /// True for values that render to nothing
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Blank => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(i64::from(v))
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Blank, Into::into)
    }
}

/// Default value formatter.
///
/// Integers print as-is, floats in their shortest round-trip form (integral
/// floats lose the trailing `.0`), fractions as `\frac{n}{d}`, text passes
/// through untouched.
pub fn latexify(value: &CellValue) -> String {
    match value {
        CellValue::Int(v) => v.to_string(),
        CellValue::Float(v) => format_float(*v),
        CellValue::Fraction(num, den) => format!(r"\frac{{{num}}}{{{den}}}"),
        CellValue::Text(s) => s.clone(),
        CellValue::Blank => String::new(),
    }
}

fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract().abs() < f64::EPSILON && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}
