use serde::{Deserialize, Serialize};

use crate::Field;

/// Suffix marking the fractional-lot market variant of a ticker.
pub const FRACTIONAL_SUFFIX: char = 'F';

/// Strip a single trailing fractional-lot marker, e.g. `PETR4F` -> `PETR4`.
pub fn normalize_ticker(ticker: &str) -> &str {
    ticker.strip_suffix(FRACTIONAL_SUFFIX).unwrap_or(ticker)
}

/// Fundamentals extracted from one details page. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSet {
    pub price: Option<f64>,
    pub eps: Option<f64>,
    pub bvps: Option<f64>,
    pub roe: Option<f64>,
    pub pe: Option<f64>,
    pub pbv: Option<f64>,
    pub dy: Option<f64>,
}

impl FieldSet {
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Price => self.price,
            Field::Eps => self.eps,
            Field::Bvps => self.bvps,
            Field::Roe => self.roe,
            Field::Pe => self.pe,
            Field::Pbv => self.pbv,
            Field::Dy => self.dy,
        }
    }

    pub fn set(&mut self, field: Field, value: f64) {
        let slot = match field {
            Field::Price => &mut self.price,
            Field::Eps => &mut self.eps,
            Field::Bvps => &mut self.bvps,
            Field::Roe => &mut self.roe,
            Field::Pe => &mut self.pe,
            Field::Pbv => &mut self.pbv,
            Field::Dy => &mut self.dy,
        };
        *slot = Some(value);
    }

    pub fn value_or_zero(&self, field: Field) -> f64 {
        self.get(field).unwrap_or(0.0)
    }

    pub fn present_count(&self) -> usize {
        Field::ALL.iter().filter(|f| self.get(**f).is_some()).count()
    }
}

/// Graham intrinsic value and the safety margin against the quoted price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub intrinsic_value: f64,
    pub safety_margin: f64,
}

/// Success body returned for a ticker lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub stock: String,
    pub price: f64,
    pub iv: f64,
    pub sm: f64,
    pub eps: f64,
    pub bvps: f64,
    pub roe: f64,
    pub pe: f64,
    pub pbv: f64,
    pub dy: f64,
}

impl StockReport {
    pub fn new(stock: impl Into<String>, fields: &FieldSet, valuation: ValuationResult) -> Self {
        Self {
            stock: stock.into(),
            price: fields.value_or_zero(Field::Price),
            iv: valuation.intrinsic_value,
            sm: valuation.safety_margin,
            eps: fields.value_or_zero(Field::Eps),
            bvps: fields.value_or_zero(Field::Bvps),
            roe: fields.value_or_zero(Field::Roe),
            pe: fields.value_or_zero(Field::Pe),
            pbv: fields.value_or_zero(Field::Pbv),
            dy: fields.value_or_zero(Field::Dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker_strips_one_suffix() {
        assert_eq!(normalize_ticker("PETR4F"), "PETR4");
        assert_eq!(normalize_ticker("ABCFF"), "ABCF");
        assert_eq!(normalize_ticker("F"), "");
    }

    #[test]
    fn test_normalize_ticker_leaves_others_alone() {
        assert_eq!(normalize_ticker("PETR4"), "PETR4");
        assert_eq!(normalize_ticker("petr4f"), "petr4f");
        assert_eq!(normalize_ticker(""), "");
    }

    #[test]
    fn test_field_set_get_set() {
        let mut fields = FieldSet::default();
        assert_eq!(fields.present_count(), 0);

        fields.set(Field::Eps, 1.23);
        fields.set(Field::Dy, 0.0);

        assert_eq!(fields.get(Field::Eps), Some(1.23));
        assert_eq!(fields.get(Field::Dy), Some(0.0));
        assert_eq!(fields.get(Field::Price), None);
        assert_eq!(fields.value_or_zero(Field::Price), 0.0);
        assert_eq!(fields.present_count(), 2);
    }

    #[test]
    fn test_report_serializes_missing_fields_as_zero() {
        let mut fields = FieldSet::default();
        fields.set(Field::Price, 10.0);

        let report = StockReport::new("PETR4", &fields, ValuationResult::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["stock"], "PETR4");
        assert_eq!(json["price"], 10.0);
        for key in ["iv", "sm", "eps", "bvps", "roe", "pe", "pbv", "dy"] {
            assert_eq!(json[key], 0.0, "{key} should be 0.0");
            assert!(json[key].is_f64());
        }
        assert_eq!(json.as_object().unwrap().len(), 10);
    }
}
