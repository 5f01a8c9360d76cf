//! `x-amz-grant-read` header assembly.

/// Request header carrying read grants on `PUT ?acl`.
pub const GRANT_READ_HEADER: &str = "x-amz-grant-read";

/// Build the grant value for canonical user IDs: `id="a",id="b"`.
pub fn grant_read_value<S: AsRef<str>>(canonical_ids: &[S]) -> String {
    canonical_ids
        .iter()
        .map(|id| format!("id=\"{}\"", id.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}
