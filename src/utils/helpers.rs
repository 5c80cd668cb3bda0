use chrono::{SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;

use crate::utils::error::CustomError;

/// Pagination bounds shared by the feed, comment and trending listings.
pub const MAX_PAGE_SIZE: i64 = 50;

pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

pub fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

pub fn parse_object_id(value: &str, what: &str) -> Result<ObjectId, CustomError> {
    ObjectId::parse_str(value)
        .map_err(|_| CustomError::BadRequestError(format!("invalid {} id", what)))
}

/// Author-only capability check shared by the post and comment mutation paths.
pub fn assert_owner(actor: &ObjectId, owner: &ObjectId, what: &str) -> Result<(), CustomError> {
    if actor != owner {
        return Err(CustomError::ForbiddenError(format!(
            "only author can modify this {}",
            what
        )));
    }

    Ok(())
}

/// Timestamps are stored the way serde writes chrono datetimes: RFC 3339 with
/// a trailing `Z`. Hand-built update documents and range filters must use the
/// same representation so string comparison stays meaningful.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_to_one_and_never_goes_below() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(clamp_page(Some(7)), 7);
    }

    #[test]
    fn limit_is_clamped_to_fifty() {
        assert_eq!(clamp_limit(None, 10), 10);
        assert_eq!(clamp_limit(Some(0), 10), 1);
        assert_eq!(clamp_limit(Some(500), 10), MAX_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(25), 10), 25);
    }

    #[test]
    fn owner_check_rejects_other_users() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert!(assert_owner(&a, &a, "post").is_ok());
        assert!(assert_owner(&a, &b, "post").is_err());
    }

    #[test]
    fn invalid_object_ids_are_bad_requests() {
        assert!(parse_object_id("not-an-id", "post").is_err());
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "post").unwrap(), id);
    }

    #[test]
    fn timestamps_end_in_z() {
        assert!(now_rfc3339().ends_with('Z'));
    }
}
