use serde::{Deserialize, Serialize};

/// One page of a remote list, as handed to the list controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult<T> {
    pub items: Vec<T>,
    /// Matching records on the server
    pub total_count: u64,
    /// Pages at the server's page size
    pub page_count: u32,
}

impl<T> FetchResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, page_count: u32) -> Self {
        Self {
            items,
            total_count,
            page_count,
        }
    }
}

impl<T> Default for FetchResult<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 0, 0)
    }
}
