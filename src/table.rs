//! Sort-header and pagination state for the course table.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }

    /// Header click. Cycles `initial -> opposite -> unsorted`.
    ///
    /// With `multi` (shift-click) the other sorted columns are kept and a newly
    /// sorted column is appended; otherwise the clicked column becomes the only
    /// sort key.
    pub fn toggle(&mut self, column: &str, initial: SortDirection, multi: bool) {
        let next = match self.direction_of(column) {
            None => Some(initial),
            Some(d) if d == initial => Some(initial.flip()),
            Some(_) => None,
        };

        if !multi {
            self.keys.retain(|k| k.column == column);
        }

        match next {
            Some(direction) => {
                if let Some(key) = self.keys.iter_mut().find(|k| k.column == column) {
                    key.direction = direction;
                } else {
                    self.keys.push(SortKey {
                        column: column.to_string(),
                        direction,
                    });
                }
            }
            None => self.keys.retain(|k| k.column != column),
        }
    }

    /// `-avg_difficulty,title` style ordering string.
    pub fn to_ordering(&self) -> String {
        self.keys
            .iter()
            .map(|k| match k.direction {
                SortDirection::Asc => k.column.clone(),
                SortDirection::Desc => format!("-{}", k.column),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Inverse of [`to_ordering`](Self::to_ordering). Only columns accepted by
    /// `allowed` are kept; duplicates keep their first occurrence.
    pub fn parse(ordering: &str, allowed: impl Fn(&str) -> bool) -> Self {
        let mut state = SortState::default();
        for part in ordering.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (column, direction) = match part.strip_prefix('-') {
                Some(rest) => (rest, SortDirection::Desc),
                None => (part, SortDirection::Asc),
            };
            if allowed(column) && state.direction_of(column).is_none() {
                state.keys.push(SortKey {
                    column: column.to_string(),
                    direction,
                });
            }
        }
        state
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn first_page(self) -> Self {
        Self { page: 1, ..self }
    }

    pub fn is_allowed_size(size: u32) -> bool {
        PAGE_SIZE_OPTIONS.contains(&size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Page buttons to show: first, last, `siblings` on each side of `current`,
/// with ellipses over the gaps.
pub fn page_window(current: u32, total: u32, siblings: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let start = current.saturating_sub(siblings).max(1);
    let end = (current + siblings).min(total);

    let mut items = Vec::new();
    if start > 1 {
        items.push(PageItem::Page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total {
        if end + 1 < total {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page(total));
    }
    items
}
