//! Cache tag hashing
//!
//! Tags are shortened to the first three hex characters of their MD5 digest.
//! Distinct tags may share a hash; a collision only widens a purge, it never
//! leaves a stale entry behind, so short hashes are acceptable.

/// Length of a tag hash in characters
pub const TAG_HASH_LEN: usize = 3;

/// Maps cache tags to short hashes
pub struct TagHasher;

impl TagHasher {
    /// Short hash of one tag
    #[must_use]
    pub fn hash(tag: &str) -> String {
        let digest = md5::compute(tag.as_bytes());
        let mut hex = hex::encode(digest.0);
        hex.truncate(TAG_HASH_LEN);
        hex
    }

    /// Hash of every tag, in input order, duplicates kept
    pub fn hash_all<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
        tags.iter().map(|t| Self::hash(t.as_ref())).collect()
    }

    /// Literal tags followed by their hashes
    ///
    /// This is the payload sent for a tag purge, so either form matches
    /// whatever a downstream cache was tagged with.
    pub fn with_hashes<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
        let mut payload = Vec::with_capacity(tags.len() * 2);
        payload.extend(tags.iter().map(|t| t.as_ref().to_string()));
        payload.extend(Self::hash_all(tags));
        payload
    }

    /// Value for a `Cache-Tag` response header
    ///
    /// Comma-joined literal tags when they fit into `limit` bytes, otherwise
    /// the comma-joined hashes.
    pub fn cache_tag_header_value<S: AsRef<str>>(tags: &[S], limit: usize) -> String {
        let literal = join(tags.iter().map(AsRef::as_ref));
        if literal.len() <= limit {
            return literal;
        }
        log::debug!(
            "[tag_hasher] {} tag(s) take {} bytes, over the {limit} byte header budget; sending hashes",
            tags.len(),
            literal.len()
        );
        join(Self::hash_all(tags).iter().map(String::as_str))
    }
}

fn join<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(",")
}
