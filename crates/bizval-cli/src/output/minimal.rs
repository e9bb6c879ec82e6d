use serde_json::Value;

use super::format_scalar;

/// Headline field per command, first match wins: a valuation's midpoint,
/// the persisted record's midpoint, a resolved multiple, a score's grade,
/// an EBITDA figure, a NAICS node's code.
const HEADLINE_KEYS: [&str; 6] = [
    "mid",
    "midEstimate",
    "multiplier",
    "overall_grade",
    "adjusted_ebitda",
    "code",
];

/// Print just the headline figure, one line per NAICS node for listings.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let headline = HEADLINE_KEYS
                .iter()
                .find_map(|k| map.get(*k).filter(|v| !v.is_null()));
            match headline {
                Some(val) => println!("{}", format_scalar(val)),
                None => {
                    if let Some((key, val)) = map.iter().next() {
                        println!("{}: {}", key, format_scalar(val));
                    }
                }
            }
        }
        Value::Array(nodes) => {
            for node in nodes {
                println!("{}", format_scalar(node.get("code").unwrap_or(node)));
            }
        }
        other => println!("{}", format_scalar(other)),
    }
}
