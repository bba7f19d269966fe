//! The news item record.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One row of the `news` table.
///
/// Field names match the selected columns, so rows decode field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::FromRow)]
pub struct NewsItem {
    /// Primary key of the news row
    pub id: i32,
    /// Headline
    pub title: String,
    /// Full text of the item
    pub body: String,
    /// Publication instant (UTC, RFC 3339)
    pub published_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_news_item_serializes_rfc3339() {
        let item = NewsItem {
            id: 1,
            title: "Breaking: AI passes bar exam".to_string(),
            body: "An AI model achieved a perfect score on the bar exam today.".to_string(),
            published_at: Utc.with_ymd_and_hms(2026, 2, 24, 12, 0, 0).unwrap(),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Breaking: AI passes bar exam");
        assert_eq!(json["published_at"], "2026-02-24T12:00:00Z");
    }

    #[test]
    fn test_news_item_accepts_offset_timestamps() {
        let json = r#"{
            "id": 2,
            "title": "New solar farm opens in Texas",
            "body": "A 500MW solar farm began producing power in west Texas.",
            "published_at": "2026-02-23T04:30:00-05:00"
        }"#;

        let item: NewsItem = serde_json::from_str(json).unwrap();
        assert_eq!(
            item.published_at,
            Utc.with_ymd_and_hms(2026, 2, 23, 9, 30, 0).unwrap()
        );
    }
}
