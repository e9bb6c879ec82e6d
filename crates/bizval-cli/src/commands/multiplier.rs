use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use bizval_core::multiplier::MultiplierResolver;
use bizval_core::types::with_metadata;

/// Arguments for multiplier resolution
#[derive(Args)]
pub struct MultiplierArgs {
    /// Composite value-driver score (0-100)
    #[arg(long)]
    pub score: Decimal,

    /// NAICS industry code; omitted or unknown codes use the generic band
    #[arg(long)]
    pub naics: Option<String>,
}

pub fn run_multiplier(
    args: MultiplierArgs,
    table: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    if args.score < Decimal::ZERO || args.score > Decimal::ONE_HUNDRED {
        return Err(format!("--score must be between 0 and 100, got {}", args.score).into());
    }

    let start = Instant::now();
    let resolver = MultiplierResolver::new(super::load_index(table)?);
    let resolution = resolver.resolve_detailed(args.naics.as_deref(), args.score);

    let mut warnings = Vec::new();
    if resolution.industry.is_none() {
        warnings.push(format!("Generic band {} applied", resolution.band));
    }

    let assumptions = serde_json::json!({
        "score": args.score,
        "naics_code": args.naics,
        "naics_edition": resolver.index().edition(),
    });
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        "Industry Multiplier Resolution",
        &assumptions,
        warnings,
        elapsed,
        resolution,
    ))?)
}
