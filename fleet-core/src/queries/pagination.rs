use serde::Deserialize;

/// One-based page selection.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { page: 1, limit: 10 }
    }
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Pagination {
        Pagination { page, limit }
    }

    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.limit as usize
    }

    pub fn pages(&self, total: usize) -> u32 {
        if self.limit == 0 {
            0
        } else {
            total.div_ceil(self.limit as usize) as u32
        }
    }
}
