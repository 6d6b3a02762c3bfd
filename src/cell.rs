use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// One sheet cell as exchanged with a [`crate::client::SheetClient`].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
}

/// Row-major cell grid, header row first.
pub type Grid = Vec<Vec<CellValue>>;

impl CellValue {
    /// Builds a cell from raw text as found in a CSV file. Text is kept
    /// verbatim; typed coercion happens when the table is built.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_string())
        }
    }

    /// Builds a cell from a value returned by the Sheets API with
    /// `UNFORMATTED_VALUE` rendering.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty),
            Value::String(s) if s.is_empty() => CellValue::Empty,
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }

    /// `CellData` payload for an `updateCells` request. An empty object
    /// clears the cell.
    pub fn to_cell_data(&self) -> Value {
        match self {
            CellValue::Empty => json!({}),
            CellValue::Number(n) => json!({ "userEnteredValue": { "numberValue": n } }),
            CellValue::Text(s) => json!({ "userEnteredValue": { "stringValue": s } }),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Any finite number. Blank cells count as zero.
    pub fn as_amount(&self) -> Option<f64> {
        match self {
            CellValue::Empty => Some(0.0),
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Number(_) => None,
            CellValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Some(0.0);
                }
                s.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }
}

fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(n as i64)
    } else {
        None
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => match integral(*n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::from_text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_fractions() {
        assert_eq!(CellValue::Text("12.75".into()).as_amount(), Some(12.75));
        assert_eq!(CellValue::Number(f64::NAN).as_amount(), None);
        assert_eq!(CellValue::Text("".into()).as_amount(), Some(0.0));
        assert_eq!(CellValue::Empty.as_amount(), Some(0.0));
        assert_eq!(CellValue::Text(" 2.5 ".into()).as_amount(), Some(2.5));
        assert_eq!(CellValue::Text("lots".into()).as_amount(), None);
    }

    #[test]
    fn json_values_map_to_cells() {
        assert_eq!(CellValue::from_json(&json!(4)), CellValue::Number(4.0));
        assert_eq!(CellValue::from_json(&json!("")), CellValue::Empty);
        assert_eq!(CellValue::from_json(&json!("Coke")), CellValue::Text("Coke".into()));
        assert_eq!(CellValue::from_json(&json!(true)), CellValue::Text("TRUE".into()));
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(15.0).to_string(), "15");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    #[test]
    fn cell_data_payloads() {
        assert_eq!(CellValue::Empty.to_cell_data(), json!({}));
        assert_eq!(
            CellValue::from(3_i64).to_cell_data(),
            json!({ "userEnteredValue": { "numberValue": 3.0 } })
        );
        assert_eq!(
            CellValue::from("Tea").to_cell_data(),
            json!({ "userEnteredValue": { "stringValue": "Tea" } })
        );
    }
}
