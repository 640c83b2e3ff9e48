use serde::{Deserialize, Serialize};

/// Canonical fundamentals read from the upstream details page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Price,
    Eps,  // Earnings Per Share (value)
    Bvps, // Book Value Per Share (value)
    Roe,  // Return on Equity (%)
    Pe,   // Price/Earnings (years)
    Pbv,  // Price/Book Value (ratio)
    Dy,   // Dividend Yield (%)
}

/// Page label text paired with the field it feeds. Matching is exact:
/// case and accents must agree with the upstream markup.
pub const LABELS: &[(&str, Field)] = &[
    ("Cotação", Field::Price),
    ("LPA", Field::Eps),
    ("VPA", Field::Bvps),
    ("ROE", Field::Roe),
    ("P/L", Field::Pe),
    ("P/VP", Field::Pbv),
    ("Div. Yield", Field::Dy),
];

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Price,
        Field::Eps,
        Field::Bvps,
        Field::Roe,
        Field::Pe,
        Field::Pbv,
        Field::Dy,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        LABELS
            .iter()
            .find(|(text, _)| *text == label)
            .map(|(_, field)| *field)
    }

    /// Key used for this field in the JSON response.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Price => "price",
            Field::Eps => "eps",
            Field::Bvps => "bvps",
            Field::Roe => "roe",
            Field::Pe => "pe",
            Field::Pbv => "pbv",
            Field::Dy => "dy",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
