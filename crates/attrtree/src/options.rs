/// Default nesting limit, matching the recursion limit serde_json applies.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Order of members in a group built from a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapOrder {
    /// Whatever order the map yields its entries in
    #[default]
    Native,
    /// Stable sort by formatted key
    ByKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub map_order: MapOrder,
    /// Maximum nesting of containers (maps, sequences, structs) before a
    /// branch is replaced by `<truncated>`; pointers do not count
    /// (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            map_order: MapOrder::Native,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl Options {
    pub fn with_map_order(mut self, order: MapOrder) -> Self {
        self.map_order = order;
        self
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }
}
