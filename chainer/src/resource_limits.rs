/// Resource limits applied while reading knowledge-base sources
///
/// Chaining itself is unbounded: a generative rule set keeps deriving for as
/// long as it produces new items. These limits only guard the parser.
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum source size in bytes
    /// Real usage: ~10KB, Limit: 5MB
    pub max_file_size_bytes: usize,

    /// Maximum number of clauses on the left-hand side of a rule
    /// Real usage: ~3 clauses, Limit: 64
    pub max_rule_clauses: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024, // 5 MB
            max_rule_clauses: 64,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }
}
