use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dollar amounts: statement lines, EBITDA, value estimates.
pub type Money = Decimal;

/// EBITDA multiple (4.5 means 4.5x adjusted EBITDA)
pub type Multiple = Decimal;

/// Composite value-driver score on a 0-100 scale
pub type Score = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

impl<T: Serialize> ComputationOutput<T> {
    /// Put `front` ahead of the warnings already collected, keeping order.
    pub fn prepend_warnings(&mut self, mut front: Vec<String>) {
        front.append(&mut self.warnings);
        self.warnings = front;
    }
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_with_metadata_envelope() {
        let out = with_metadata(
            "Test Method",
            &serde_json::json!({ "k": "v" }),
            vec!["careful".into()],
            42,
            dec!(1.5),
        );
        assert_eq!(out.result, dec!(1.5));
        assert_eq!(out.methodology, "Test Method");
        assert_eq!(out.assumptions["k"], "v");
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.metadata.computation_time_us, 42);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_prepend_warnings_keeps_order() {
        let mut out = with_metadata("m", &(), vec!["later".into()], 0, ());
        out.prepend_warnings(vec!["first".into(), "second".into()]);
        assert_eq!(out.warnings, vec!["first", "second", "later"]);
    }
}
