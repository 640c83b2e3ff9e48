use valuation_core::{Field, FieldSet, ValuationResult};

/// Graham's multiplier: a P/E of 15 times a P/BV of 1.5.
pub const GRAHAM_MULTIPLIER: f64 = 22.5;

/// Round half away from zero to `places` decimals.
///
/// The scaled value is first cut to 15 significant digits so that decimal
/// halves stored just under `.5` in binary (`1.005`, `1.96875` from a
/// division) still round away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    let pre_rounded = format!("{:.14e}", scaled).parse::<f64>().unwrap_or(scaled);
    pre_rounded.round() / factor
}

/// Benjamin Graham intrinsic value and safety margin over a [`FieldSet`].
#[derive(Debug, Default, Clone, Copy)]
pub struct GrahamCalculator;

impl GrahamCalculator {
    pub fn new() -> Self {
        Self
    }

    /// `sqrt(22.5 * eps * bvps)` rounded to cents, or 0.0 unless both inputs are positive.
    pub fn intrinsic_value(&self, fields: &FieldSet) -> f64 {
        let eps = fields.value_or_zero(Field::Eps);
        match fields.get(Field::Bvps) {
            Some(bvps) if eps > 0.0 && bvps > 0.0 => {
                round_to((GRAHAM_MULTIPLIER * eps * bvps).sqrt(), 2)
            }
            _ => 0.0,
        }
    }

    /// Percentage by which `intrinsic_value` exceeds the quoted price.
    /// The ratio is rounded to four decimals before scaling to percent.
    pub fn safety_margin(&self, fields: &FieldSet, intrinsic_value: f64) -> f64 {
        match fields.get(Field::Price) {
            Some(price) if intrinsic_value > 0.0 => {
                round_to(-((price - intrinsic_value) / intrinsic_value), 4) * 100.0
            }
            _ => 0.0,
        }
    }

    pub fn value(&self, fields: &FieldSet) -> ValuationResult {
        let intrinsic_value = self.intrinsic_value(fields);
        let safety_margin = self.safety_margin(fields, intrinsic_value);

        tracing::debug!(intrinsic_value, safety_margin, "valuation computed");

        ValuationResult {
            intrinsic_value,
            safety_margin,
        }
    }
}
