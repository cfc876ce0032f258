use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::models::thread::{Post, Thread};

/// Base URL images are served from. Only used to synthesize download URLs;
/// the binaries themselves are never fetched.
const IMAGE_BASE: &str = "https://i.4cdn.org";

/// Summary of a thread's opening post, one line of `thread_list.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadStarterRecord {
    /// Post number of the OP.
    pub no: u64,

    /// Creation time as formatted by the API.
    pub now: String,

    /// Name the user posted with.
    pub name: String,

    /// Thread subject.
    pub sub: String,

    /// UNIX timestamp of post creation.
    pub time: u64,

    /// SEO URL slug of the thread.
    pub semantic_url: String,

    /// Reply count at fetch time.
    pub replies: u32,

    /// Image reply count at fetch time.
    pub images: u32,
}

impl ThreadStarterRecord {
    fn from_post(post: &Post) -> Self {
        Self {
            no: post.no,
            now: post.now.clone(),
            name: post.name.clone(),
            sub: post.sub.clone().unwrap_or_default(),
            time: post.time,
            semantic_url: post.semantic_url.clone().unwrap_or_default(),
            replies: post.replies.unwrap_or(0),
            images: post.images.unwrap_or(0),
        }
    }
}

/// Metadata of one image-carrying post, one line of a per-thread
/// `<board>-<no>_ImageURLs.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePostRecord {
    /// The numeric post ID.
    pub no: u64,

    /// Creation time as formatted by the API.
    pub now: String,

    /// Name the user posted with.
    pub name: String,

    /// Comment body (HTML escaped).
    pub com: String,

    /// Filename as it appeared on the poster's device.
    pub filename: String,

    /// File extension including the leading dot.
    pub ext: String,

    /// Image width in pixels.
    pub w: u32,

    /// Image height in pixels.
    pub h: u32,

    /// UNIX timestamp of post creation.
    pub time: u64,

    /// Packed base64 MD5 hash of the file.
    pub md5: String,

    /// File size in bytes.
    pub fsize: u64,

    /// Thread the post belongs to; 0 if the post is the OP.
    pub resto: u64,

    /// Synthesized download URL of the full-size image.
    pub url: String,
}

impl ImagePostRecord {
    fn from_post(post: &Post, board: &Board, tim: u64, ext: &str) -> Self {
        Self {
            no: post.no,
            now: post.now.clone(),
            name: post.name.clone(),
            com: post.com.clone().unwrap_or_default(),
            filename: post.filename.clone().unwrap_or_default(),
            ext: ext.to_string(),
            w: post.w.unwrap_or(0),
            h: post.h.unwrap_or(0),
            time: post.time,
            md5: post.md5.clone().unwrap_or_default(),
            fsize: post.fsize.unwrap_or(0),
            resto: post.resto,
            url: format!("{IMAGE_BASE}/{board}/{tim}{ext}"),
        }
    }
}

/// Extracts one record per post that carries a subject field.
///
/// The API only attaches a subject to opening posts, so this normally yields
/// a single record. Missing optional fields default to empty strings and
/// zeros; source post order is preserved.
pub fn thread_starters(thread: &Thread) -> Vec<ThreadStarterRecord> {
    thread
        .posts
        .iter()
        .filter(|post| post.sub.is_some())
        .map(ThreadStarterRecord::from_post)
        .collect()
}

/// Extracts one record per post that carries both an image timestamp and an
/// extension, synthesizing each post's image download URL.
///
/// Missing optional fields default to empty strings and zeros; source post
/// order is preserved.
pub fn image_posts(thread: &Thread, board: &Board) -> Vec<ImagePostRecord> {
    thread
        .posts
        .iter()
        .filter_map(|post| match (post.tim, post.ext.as_deref()) {
            (Some(tim), Some(ext)) => Some(ImagePostRecord::from_post(post, board, tim, ext)),
            _ => None,
        })
        .collect()
}
