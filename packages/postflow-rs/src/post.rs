//! Post summary model.
//!
//! The unit of work. Posts are created and mutated remotely; the client only
//! reflects their state. The canonical stage is always derived from the raw
//! status, never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::status::CanonicalStage;

/// Lightweight post summary for lists and dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,

    /// Raw status code as the backend reports it.
    pub raw_status: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
}

impl Post {
    /// Canonical stage, recomputed from the raw status on every call.
    pub fn canonical_stage(&self) -> CanonicalStage {
        CanonicalStage::from_raw(&self.raw_status)
    }

    /// Days until the scheduled publish date, negative if already past.
    /// `None` when no date is set.
    pub fn days_until_publish(&self, today: NaiveDate) -> Option<i64> {
        self.publish_date
            .map(|date| (date - today).num_days())
    }
}

/// Order posts soonest-publish-first; undated posts sort last, keeping their
/// relative order.
pub fn sort_by_publish_date(posts: &mut [Post]) {
    posts.sort_by_key(|post| match post.publish_date {
        Some(date) => (0, date),
        None => (1, NaiveDate::MAX),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, date: Option<&str>) -> Post {
        Post {
            id: id.to_string(),
            raw_status: "client_review".to_string(),
            title: None,
            publish_date: date.map(|d| d.parse().unwrap()),
        }
    }

    #[test]
    fn test_canonical_stage_is_derived() {
        let mut p = post("p-1", None);
        assert_eq!(p.canonical_stage(), CanonicalStage::ClientReview);

        p.raw_status = "published".to_string();
        assert_eq!(p.canonical_stage(), CanonicalStage::Published);
    }

    #[test]
    fn test_sort_soonest_first_undated_last() {
        let mut posts = vec![
            post("late", Some("2026-09-20")),
            post("undated-a", None),
            post("soon", Some("2026-09-01")),
            post("undated-b", None),
        ];
        sort_by_publish_date(&mut posts);

        let order: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["soon", "late", "undated-a", "undated-b"]);
    }

    #[test]
    fn test_days_until_publish() {
        let today: NaiveDate = "2026-08-30".parse().unwrap();
        assert_eq!(post("p", Some("2026-09-02")).days_until_publish(today), Some(3));
        assert_eq!(post("p", Some("2026-08-28")).days_until_publish(today), Some(-2));
        assert_eq!(post("p", None).days_until_publish(today), None);
    }
}
