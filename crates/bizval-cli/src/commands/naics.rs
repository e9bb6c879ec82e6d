use clap::{Args, Subcommand};
use serde_json::Value;

use bizval_core::naics::NaicsNode;

/// Arguments for browsing the NAICS table
#[derive(Args)]
pub struct NaicsArgs {
    #[command(subcommand)]
    pub command: NaicsCommand,
}

#[derive(Subcommand)]
pub enum NaicsCommand {
    /// Look up a code; with --fallback, walk up to the nearest priced ancestor
    Lookup {
        code: String,
        #[arg(long)]
        fallback: bool,
    },
    /// Direct children of a code
    Children { code: String },
    /// Every ancestor of a code, sector first
    Ancestors { code: String },
    /// Top-level sectors
    Sectors,
}

pub fn run_naics(args: NaicsArgs, table: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let index = super::load_index(table)?;

    match args.command {
        NaicsCommand::Lookup { code, fallback } => {
            let node = if fallback {
                index.lookup_with_fallback(&code)
            } else {
                index.lookup_exact(&code)
            };
            let node = node.ok_or_else(|| {
                if fallback {
                    format!("No multiplier band found for NAICS code '{code}' or its ancestors")
                } else {
                    format!("NAICS code '{code}' not found")
                }
            })?;
            Ok(serde_json::json!({
                "result": node,
                "requested_code": code,
                "exact": node.code == code.trim(),
                "edition": index.edition(),
            }))
        }
        NaicsCommand::Children { code } => {
            if index.lookup_exact(&code).is_none() {
                return Err(format!("NAICS code '{code}' not found").into());
            }
            nodes_value(index.children_of(&code))
        }
        NaicsCommand::Ancestors { code } => {
            if index.lookup_exact(&code).is_none() {
                return Err(format!("NAICS code '{code}' not found").into());
            }
            nodes_value(index.ancestors_of(&code))
        }
        NaicsCommand::Sectors => nodes_value(index.roots()),
    }
}

fn nodes_value(nodes: Vec<&NaicsNode>) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::json!({ "result": serde_json::to_value(nodes)? }))
}
