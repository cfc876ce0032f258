use serde::{Deserialize, Serialize};

use crate::models::maybe_de_bool;

/// A fetched thread: the ordered posts of one discussion.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Posts in the thread, starting with the OP.
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// A single post as returned by the read-only API.
///
/// Every field except the post number is optional on the wire: absent fields
/// deserialize to `None` or to the type's empty value, and unknown fields
/// are ignored. Whether a post counts as a thread starter or an image post
/// is decided purely by the presence of `sub` and of `tim` + `ext`.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// The numeric post ID.
    pub no: u64,

    /// ID of the thread being replied to; 0 for OP posts.
    #[serde(default)]
    pub resto: u64,

    /// 1 if the thread is stickied, not present otherwise (OP only).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "maybe_de_bool"
    )]
    pub sticky: Option<bool>,

    /// 1 if the thread is closed to replies, not present otherwise (OP only).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "maybe_de_bool"
    )]
    pub closed: Option<bool>,

    /// Time of post creation in MM/DD/YY(Day)HH:MM(:SS) EST/EDT format.
    #[serde(default)]
    pub now: String,

    /// UNIX timestamp of post creation.
    #[serde(default)]
    pub time: u64,

    /// Name the user posted with (defaults to "Anonymous").
    #[serde(default)]
    pub name: String,

    /// Tripcode for the post (if present).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip: Option<String>,

    /// OP subject text (if present).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Comment body (HTML escaped) if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub com: Option<String>,

    /// UNIX timestamp (with microseconds) of image upload (if the post has
    /// an attachment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tim: Option<u64>,

    /// Filename as it appeared on the poster's device (if the post has an
    /// attachment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Filetype including the leading dot (if the post has an attachment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,

    /// Size of the uploaded file in bytes (if the post has an attachment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fsize: Option<u64>,

    /// 24 character, packed base64 MD5 hash of the file (if the post has an
    /// attachment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,

    /// Image width dimension (if the post has an attachment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,

    /// Image height dimension (if the post has an attachment).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,

    /// Total number of replies to the thread (OP only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<u32>,

    /// Total number of image replies to the thread (OP only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<u32>,

    /// SEO URL slug for the thread (OP only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_url: Option<String>,

    /// 1 if the thread has been archived, not present otherwise.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "maybe_de_bool"
    )]
    pub archived: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::{Post, Thread};
    use serde_json::json;

    #[test]
    fn integer_coded_booleans_decode() {
        let post: Post =
            serde_json::from_value(json!({ "no": 1, "sticky": 1, "closed": 0 })).unwrap();
        assert_eq!(post.sticky, Some(true));
        assert_eq!(post.closed, Some(false));
        assert_eq!(post.archived, None);
    }

    #[test]
    fn absent_fields_take_empty_values() {
        let post: Post = serde_json::from_value(json!({ "no": 7 })).unwrap();
        assert_eq!(post.resto, 0);
        assert_eq!(post.time, 0);
        assert_eq!(post.now, "");
        assert_eq!(post.name, "");
        assert!(post.sub.is_none());
        assert!(post.tim.is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let thread: Thread = serde_json::from_value(json!({
            "posts": [
                { "no": 1, "sub": "op", "tail_size": 50, "unique_ips": 12 },
                { "no": 2, "resto": 1 },
            ]
        }))
        .unwrap();
        assert_eq!(thread.posts.len(), 2);
        assert_eq!(thread.posts[0].sub.as_deref(), Some("op"));
    }

    #[test]
    fn post_without_a_number_fails_to_decode() {
        let result: Result<Thread, _> =
            serde_json::from_value(json!({ "posts": [{ "now": "01/01/24" }] }));
        assert!(result.is_err());
    }
}
