pub use self::{car::*, contract::*, outbox::*, request::*, user::*};

mod car;
mod contract;
mod outbox;
mod request;
mod user;

/// Zero-based page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.page * self.size
    }
}

/// Sortable columns of a rental request. Typed so drivers never interpolate
/// caller-supplied strings into a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSortField {
    CreatedAt,
    UpdatedAt,
}

impl RequestSortField {
    pub fn as_column(&self) -> &'static str {
        match self {
            RequestSortField::CreatedAt => "created_at",
            RequestSortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSort {
    field: RequestSortField,
    direction: SortDirection,
}

impl RequestSort {
    pub fn new(field: RequestSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn field(&self) -> &RequestSortField {
        &self.field
    }

    pub fn direction(&self) -> &SortDirection {
        &self.direction
    }

    pub fn is_descending(&self) -> bool {
        matches!(self.direction, SortDirection::Descending)
    }
}
