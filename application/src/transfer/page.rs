/// One page of results plus a total computed by a separately-issued count
/// query. The two are not transactionally coupled; the total may be stale
/// relative to the items under concurrent writes.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, size: i64) -> Self {
        Self {
            items,
            total,
            page,
            size,
        }
    }
}
