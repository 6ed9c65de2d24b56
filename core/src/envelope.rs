//! Response envelopes and the fields every record shares.

use serde::{Deserialize, Serialize};

/// Single-payload envelope: `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Data<T> {
    pub data: T,
}

/// Navigation links of a paginated listing. Absent links are `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Pagination metadata. `from`/`to` are 1-based and `None` on an empty page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: u64,
    #[serde(default)]
    pub from: Option<u64>,
    pub last_page: u64,
    pub per_page: u64,
    #[serde(default)]
    pub to: Option<u64>,
    pub total: u64,
}

impl PageMeta {
    /// Metadata for page `page` of `total` records split `per_page` a page.
    pub fn for_page(total: u64, per_page: u64, page: u64) -> Self {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let last_page = total.div_ceil(per_page).max(1);
        let start = per_page * (page - 1) + 1;
        let (from, to) = if start > total {
            (None, None)
        } else {
            (Some(start), Some((start + per_page - 1).min(total)))
        };
        Self {
            current_page: page,
            from,
            last_page,
            per_page,
            to,
            total,
        }
    }

    /// `current_page` within `1..=last_page` and `from`/`to` matching
    /// `per_page * (current_page - 1) + 1` bounded by `total`.
    pub fn is_consistent(&self) -> bool {
        if self.total == 0 {
            return self.from.is_none() && self.to.is_none();
        }
        if self.per_page == 0 || self.current_page == 0 || self.current_page > self.last_page {
            return false;
        }
        if self.last_page != self.total.div_ceil(self.per_page) {
            return false;
        }
        let expected = Self::for_page(self.total, self.per_page, self.current_page);
        self.from == expected.from && self.to == expected.to
    }

    /// Number of records on this page according to `from`/`to`.
    pub fn page_len(&self) -> u64 {
        match (self.from, self.to) {
            (Some(from), Some(to)) if to >= from => to - from + 1,
            _ => 0,
        }
    }
}

/// A page of records: `{"data": [...], "links": {...}, "meta": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub links: PageLinks,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.meta.current_page < self.meta.last_page
    }

    /// Metadata is consistent and agrees with the number of records carried.
    pub fn is_consistent(&self) -> bool {
        self.meta.is_consistent() && self.meta.page_len() == self.data.len() as u64
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            links: self.links,
            meta: self.meta,
        }
    }
}

impl<T: Entity> Paginated<T> {
    /// Records without a deletion timestamp. Listings are never filtered
    /// implicitly; views that must not show deleted records call this.
    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.data.iter().filter(|item| !item.is_deleted())
    }
}

/// Server-managed timestamps carried by every record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timestamps {
    #[serde(alias = "createdAt")]
    pub created_at: String,
    #[serde(alias = "updatedAt")]
    pub updated_at: String,
    #[serde(default, alias = "deletedAt", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

/// A record with a server-assigned identifier and timestamps.
pub trait Entity {
    fn id(&self) -> u64;

    fn timestamps(&self) -> &Timestamps;

    /// Soft-deleted records keep their row but carry `deleted_at`.
    fn is_deleted(&self) -> bool {
        self.timestamps().deleted_at.is_some()
    }
}

/// Implements [`Entity`] for a struct with `id: u64` and a flattened
/// `timestamps: Timestamps` field.
#[macro_export]
macro_rules! impl_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::envelope::Entity for $ty {
                fn id(&self) -> u64 {
                    self.id
                }

                fn timestamps(&self) -> &$crate::envelope::Timestamps {
                    &self.timestamps
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_page_second_of_two() {
        let meta = PageMeta::for_page(15, 10, 2);
        assert_eq!(meta.last_page, 2);
        assert_eq!(meta.from, Some(11));
        assert_eq!(meta.to, Some(15));
        assert_eq!(meta.page_len(), 5);
        assert!(meta.is_consistent());
    }

    #[test]
    fn empty_listing_is_consistent() {
        let meta = PageMeta::for_page(0, 10, 1);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.from, None);
        assert!(meta.is_consistent());
    }

    #[test]
    fn page_past_the_end_is_inconsistent() {
        let meta = PageMeta::for_page(15, 10, 3);
        assert_eq!(meta.from, None);
        assert!(!meta.is_consistent());
    }

    #[test]
    fn tampered_range_is_inconsistent() {
        let mut meta = PageMeta::for_page(15, 10, 1);
        meta.to = Some(11);
        assert!(!meta.is_consistent());
    }

    #[test]
    fn links_default_when_missing() {
        let page: Paginated<u32> = serde_json::from_str(
            r#"{"data":[1,2],"meta":{"current_page":1,"from":1,"last_page":1,"per_page":10,"to":2,"total":2}}"#,
        )
        .unwrap();
        assert_eq!(page.links, PageLinks::default());
        assert!(page.is_consistent());
        assert!(!page.has_next());
    }

    #[test]
    fn timestamps_accept_camel_case() {
        let ts: Timestamps = serde_json::from_str(
            r#"{"createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-02T00:00:00Z","deletedAt":null}"#,
        )
        .unwrap();
        assert_eq!(ts.updated_at, "2024-01-02T00:00:00Z");
        assert_eq!(ts.deleted_at, None);
    }
}
