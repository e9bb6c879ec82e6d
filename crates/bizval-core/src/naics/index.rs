use chrono::NaiveDate;
use std::collections::HashMap;

use super::node::{is_valid_code, NaicsNode, MIN_CODE_LEN};
use super::reference::NaicsTable;
use crate::{BizValError, BizValResult};

/// Immutable NAICS classification tree.
///
/// Nodes live in a flat arena sorted by code, so every traversal that walks
/// the arena in index order is already in ascending code order. Built once
/// and shared read-only (`Arc<NaicsIndex>`) between any number of callers.
#[derive(Debug, Clone)]
pub struct NaicsIndex {
    edition: String,
    as_of: Option<NaiveDate>,
    nodes: Vec<NaicsNode>,
    by_code: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl NaicsIndex {
    /// Validate a reference table and build the index.
    ///
    /// Fails with `BizValError::Config` on a malformed or duplicated code, an
    /// unresolvable parent, a parent that is not a shorter prefix of its
    /// child, or an invalid multiplier band. Parent links therefore always
    /// agree with the prefix walk in [`NaicsIndex::lookup_with_fallback`].
    pub fn from_table(table: NaicsTable) -> BizValResult<Self> {
        let NaicsTable {
            edition,
            as_of,
            mut entries,
        } = table;

        for entry in &mut entries {
            entry.code = entry.code.trim().to_string();
        }
        entries.sort_by(|a, b| a.code.cmp(&b.code));

        let mut nodes: Vec<NaicsNode> = Vec::with_capacity(entries.len());
        let mut by_code: HashMap<String, usize> = HashMap::with_capacity(entries.len());

        for entry in &entries {
            if !is_valid_code(&entry.code) {
                return Err(BizValError::Config {
                    code: entry.code.clone(),
                    reason: "code must be 2 to 6 digits".into(),
                });
            }
            if by_code.contains_key(&entry.code) {
                return Err(BizValError::Config {
                    code: entry.code.clone(),
                    reason: "duplicate code".into(),
                });
            }
            let band = entry.band()?;
            by_code.insert(entry.code.clone(), nodes.len());
            nodes.push(NaicsNode {
                code: entry.code.clone(),
                title: entry.title.trim().to_string(),
                level: entry.code.len() as u8,
                parent_code: entry
                    .parent_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from),
                band,
            });
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut roots: Vec<usize> = Vec::new();

        for idx in 0..nodes.len() {
            let parent_idx = match nodes[idx].parent_code.clone() {
                Some(parent) => {
                    let pidx = *by_code.get(&parent).ok_or_else(|| BizValError::Config {
                        code: nodes[idx].code.clone(),
                        reason: format!("parent code '{parent}' does not exist"),
                    })?;
                    if !nodes[idx].code.starts_with(&parent) {
                        return Err(BizValError::Config {
                            code: nodes[idx].code.clone(),
                            reason: format!("parent code '{parent}' is not a prefix of the code"),
                        });
                    }
                    if nodes[pidx].level >= nodes[idx].level {
                        return Err(BizValError::Config {
                            code: nodes[idx].code.clone(),
                            reason: format!(
                                "parent code '{parent}' is not above level {}",
                                nodes[idx].level
                            ),
                        });
                    }
                    Some(pidx)
                }
                None => {
                    let inferred = longest_prefix(&by_code, &nodes[idx].code);
                    if let Some(pidx) = inferred {
                        nodes[idx].parent_code = Some(nodes[pidx].code.clone());
                    }
                    inferred
                }
            };

            match parent_idx {
                Some(pidx) => children[pidx].push(idx),
                None => roots.push(idx),
            }
        }

        tracing::info!(
            edition = %edition,
            nodes = nodes.len(),
            sectors = roots.len(),
            "NAICS index built"
        );

        Ok(NaicsIndex {
            edition,
            as_of,
            nodes,
            by_code,
            children,
            roots,
        })
    }

    /// Index over the multiplier table shipped with the crate.
    #[cfg(feature = "builtin-naics")]
    pub fn builtin() -> BizValResult<Self> {
        Self::from_table(NaicsTable::builtin()?)
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = &NaicsNode> {
        self.nodes.iter()
    }

    /// Top-level nodes (normally the two-digit sectors).
    pub fn roots(&self) -> Vec<&NaicsNode> {
        self.roots.iter().map(|&i| &self.nodes[i]).collect()
    }

    pub fn lookup_exact(&self, code: &str) -> Option<&NaicsNode> {
        self.by_code.get(code.trim()).map(|&i| &self.nodes[i])
    }

    /// Most specific node carrying a multiplier band for `code`.
    ///
    /// Tries the code itself, then each shorter prefix down to the two-digit
    /// sector. Returns `None` for malformed codes or when no prefix has a
    /// band.
    pub fn lookup_with_fallback(&self, code: &str) -> Option<&NaicsNode> {
        let code = code.trim();
        if !is_valid_code(code) {
            return None;
        }
        (MIN_CODE_LEN..=code.len())
            .rev()
            .filter_map(|len| self.lookup_exact(&code[..len]))
            .find(|node| node.band.is_some())
    }

    /// Direct children of `parent_code`, ascending. Unknown codes have none.
    pub fn children_of(&self, parent_code: &str) -> Vec<&NaicsNode> {
        match self.by_code.get(parent_code.trim()) {
            Some(&i) => self.children[i].iter().map(|&c| &self.nodes[c]).collect(),
            None => Vec::new(),
        }
    }

    /// Every node above `code`, sector first. Excludes the node itself.
    pub fn ancestors_of(&self, code: &str) -> Vec<&NaicsNode> {
        let mut out = Vec::new();
        let mut current = self.lookup_exact(code);
        while let Some(node) = current {
            current = node
                .parent_code
                .as_deref()
                .and_then(|p| self.lookup_exact(p));
            if let Some(parent) = current {
                out.push(parent);
            }
        }
        out.sort_by(|a, b| a.code.cmp(&b.code));
        out
    }

    /// Every node below `code`, ascending. Excludes the node itself.
    pub fn descendants_of(&self, code: &str) -> Vec<&NaicsNode> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = match self.by_code.get(code.trim()) {
            Some(&i) => self.children[i].clone(),
            None => return out,
        };
        while let Some(idx) = stack.pop() {
            out.push(&self.nodes[idx]);
            stack.extend(self.children[idx].iter().copied());
        }
        out.sort_by(|a, b| a.code.cmp(&b.code));
        out
    }
}

fn longest_prefix(by_code: &HashMap<String, usize>, code: &str) -> Option<usize> {
    (MIN_CODE_LEN..code.len())
        .rev()
        .find_map(|len| by_code.get(&code[..len]).copied())
}
