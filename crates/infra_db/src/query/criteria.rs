//! Criteria shared by every entity query

use crate::sql::Direction;

/// Optional filter criteria common to plans and subscriptions
///
/// An absent criterion contributes nothing to the compiled statement.
/// `offset` and `limit` are only applied when strictly positive, so an
/// explicit zero behaves like leaving them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub id: Option<String>,
    pub id_in: Option<Vec<String>>,
    pub status: Option<String>,
    pub status_in: Option<Vec<String>>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub order_by: Option<String>,
    pub order_direction: Option<Direction>,
    pub count_only: bool,
    pub include_soft_deleted: bool,
}

impl Criteria {
    /// Offset to apply, if any
    pub fn effective_offset(&self) -> Option<u64> {
        self.offset.filter(|offset| *offset > 0)
    }

    /// Limit to apply, if any
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit.filter(|limit| *limit > 0)
    }

    /// Direction to apply; descending unless explicitly ascending
    pub fn effective_direction(&self) -> Direction {
        self.order_direction.unwrap_or_default()
    }
}

/// Generates the consuming builder methods and getters over `Criteria`
///
/// The target type must expose `criteria: Criteria`.
macro_rules! criteria_builders {
    ($query:ty) => {
        impl $query {
            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.criteria.id = Some(id.into());
                self
            }

            pub fn with_id_in<I, S>(mut self, ids: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.criteria.id_in = Some(ids.into_iter().map(Into::into).collect());
                self
            }

            pub fn with_status(mut self, status: impl Into<String>) -> Self {
                self.criteria.status = Some(status.into());
                self
            }

            pub fn with_status_in<I, S>(mut self, statuses: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.criteria.status_in = Some(statuses.into_iter().map(Into::into).collect());
                self
            }

            pub fn with_offset(mut self, offset: u64) -> Self {
                self.criteria.offset = Some(offset);
                self
            }

            pub fn with_limit(mut self, limit: u64) -> Self {
                self.criteria.limit = Some(limit);
                self
            }

            pub fn with_order_by(mut self, column: impl Into<String>) -> Self {
                self.criteria.order_by = Some(column.into());
                self
            }

            /// Sets the direction from its name; see `Direction::parse`
            pub fn with_order_direction(mut self, direction: &str) -> Self {
                self.criteria.order_direction = Some($crate::sql::Direction::parse(direction));
                self
            }

            pub fn with_count_only(mut self, count_only: bool) -> Self {
                self.criteria.count_only = count_only;
                self
            }

            pub fn with_soft_deleted_included(mut self, include: bool) -> Self {
                self.criteria.include_soft_deleted = include;
                self
            }

            pub fn id(&self) -> Option<&str> {
                self.criteria.id.as_deref()
            }

            pub fn id_in(&self) -> Option<&[String]> {
                self.criteria.id_in.as_deref()
            }

            pub fn status(&self) -> Option<&str> {
                self.criteria.status.as_deref()
            }

            pub fn status_in(&self) -> Option<&[String]> {
                self.criteria.status_in.as_deref()
            }

            pub fn offset(&self) -> Option<u64> {
                self.criteria.offset
            }

            pub fn limit(&self) -> Option<u64> {
                self.criteria.limit
            }

            pub fn order_by(&self) -> Option<&str> {
                self.criteria.order_by.as_deref()
            }

            pub fn order_direction(&self) -> Option<$crate::sql::Direction> {
                self.criteria.order_direction
            }

            pub fn is_count_only(&self) -> bool {
                self.criteria.count_only
            }

            pub fn includes_soft_deleted(&self) -> bool {
                self.criteria.include_soft_deleted
            }
        }
    };
}
