use mongodb::bson::{Document, doc};
use serde::Deserialize;

use crate::utils::helpers::MAX_PAGE_SIZE;

/// Score weights: a comment is worth one and a half likes.
pub const LIKE_WEIGHT: i64 = 2;
pub const COMMENT_WEIGHT: i64 = 3;

pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const MAX_WINDOW_DAYS: i64 = 365;
pub const DEFAULT_TRENDING_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub days: Option<i64>,
    pub limit: Option<i64>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

pub fn clamp_days(days: Option<i64>) -> i64 {
    days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, MAX_WINDOW_DAYS)
}

pub fn clamp_trending_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_TRENDING_LIMIT).clamp(1, MAX_PAGE_SIZE)
}

/// Read-time ranking pipeline: select recent published posts, score them from
/// their counters, take the top slice and join the author in. The score never
/// leaves the pipeline.
pub fn build_pipeline(query: &TrendingQuery, since: &str) -> Vec<Document> {
    let mut filter = doc! {
        "status": "published",
        "is_deleted": false,
        "created_at": { "$gte": since },
    };

    if let Some(tag) = &query.tag {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() {
            filter.insert("tags", tag);
        }
    }

    if let Some(search) = &query.search {
        let search = search.trim();
        if !search.is_empty() {
            let pattern = regex::escape(search);
            filter.insert(
                "$or",
                vec![
                    doc! { "title": { "$regex": &pattern, "$options": "i" } },
                    doc! { "content": { "$regex": &pattern, "$options": "i" } },
                ],
            );
        }
    }

    vec![
        doc! { "$match": filter },
        doc! { "$addFields": { "score": { "$add": [
            { "$multiply": ["$likes_count", LIKE_WEIGHT] },
            { "$multiply": ["$comments_count", COMMENT_WEIGHT] },
        ] } } },
        doc! { "$sort": { "score": -1, "created_at": -1 } },
        doc! { "$limit": clamp_trending_limit(query.limit) },
        doc! { "$lookup": {
            "from": "users",
            "localField": "author_id",
            "foreignField": "_id",
            "as": "author",
        } },
        doc! { "$unwind": "$author" },
        doc! { "$addFields": { "author": { "id": "$author._id", "username": "$author.username" } } },
        doc! { "$project": { "score": 0 } },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(
        days: Option<i64>,
        limit: Option<i64>,
        tag: Option<&str>,
        search: Option<&str>,
    ) -> TrendingQuery {
        TrendingQuery {
            days,
            limit,
            tag: tag.map(String::from),
            search: search.map(String::from),
        }
    }

    #[test]
    fn window_is_clamped_to_a_year() {
        assert_eq!(clamp_days(None), 7);
        assert_eq!(clamp_days(Some(0)), 1);
        assert_eq!(clamp_days(Some(-5)), 1);
        assert_eq!(clamp_days(Some(9999)), MAX_WINDOW_DAYS);
        assert_eq!(clamp_days(Some(30)), 30);
    }

    #[test]
    fn limit_is_clamped_to_fifty() {
        assert_eq!(clamp_trending_limit(None), 20);
        assert_eq!(clamp_trending_limit(Some(0)), 1);
        assert_eq!(clamp_trending_limit(Some(200)), MAX_PAGE_SIZE);
    }

    #[test]
    fn comments_outweigh_likes_three_to_two() {
        let score = |likes: i64, comments: i64| likes * LIKE_WEIGHT + comments * COMMENT_WEIGHT;

        // (likes, comments) = (10,0), (0,4), (5,2) -> 20, 12, 16
        let mut posts = vec![(10, 0), (0, 4), (5, 2)];
        posts.sort_by_key(|&(likes, comments)| -score(likes, comments));

        assert_eq!(posts, vec![(10, 0), (5, 2), (0, 4)]);
    }

    #[test]
    fn match_stage_selects_recent_published_posts() {
        let pipeline = build_pipeline(&query(None, None, None, None), "2026-08-01T00:00:00Z");
        let filter = pipeline[0].get_document("$match").unwrap();

        assert_eq!(filter.get_str("status").unwrap(), "published");
        assert!(!filter.get_bool("is_deleted").unwrap());
        assert_eq!(
            filter
                .get_document("created_at")
                .unwrap()
                .get_str("$gte")
                .unwrap(),
            "2026-08-01T00:00:00Z"
        );
    }

    #[test]
    fn tag_filter_is_lowercased() {
        let pipeline = build_pipeline(&query(None, None, Some(" RuSt "), None), "x");
        let filter = pipeline[0].get_document("$match").unwrap();
        assert_eq!(filter.get_str("tags").unwrap(), "rust");
    }

    #[test]
    fn search_input_is_regex_escaped() {
        let pipeline = build_pipeline(&query(None, None, None, Some("c++ (tips)")), "x");
        let filter = pipeline[0].get_document("$match").unwrap();
        let title = filter.get_array("$or").unwrap()[0]
            .as_document()
            .unwrap()
            .get_document("title")
            .unwrap();

        assert_eq!(title.get_str("$regex").unwrap(), r"c\+\+ \(tips\)");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn sorts_by_score_then_recency_and_strips_the_score() {
        let pipeline = build_pipeline(&query(None, Some(5), None, None), "x");

        let sort = pipeline[2].get_document("$sort").unwrap();
        let keys: Vec<&str> = sort.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["score", "created_at"]);
        assert_eq!(sort.get_i32("score").unwrap(), -1);
        assert_eq!(sort.get_i32("created_at").unwrap(), -1);

        assert_eq!(pipeline[3].get_i64("$limit").unwrap(), 5);

        let last = pipeline.last().unwrap().get_document("$project").unwrap();
        assert_eq!(last.get_i32("score").unwrap(), 0);
    }
}
