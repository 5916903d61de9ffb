use bytes::{Bytes, BytesMut};
use reqwest::Response;

/// Reads at most `limit` bytes of the response body.
///
/// The body is pulled chunk by chunk and reading stops once the limit is
/// reached, so an oversized body is never buffered in full.
pub async fn read_bounded(mut response: Response, limit: usize) -> Result<Bytes, reqwest::Error> {
    let mut buf = BytesMut::with_capacity(limit.min(8 * 1024));

    while buf.len() < limit {
        let Some(chunk) = response.chunk().await? else {
            break;
        };
        let take = chunk.len().min(limit - buf.len());
        buf.extend_from_slice(&chunk[..take]);
    }

    Ok(buf.freeze())
}

/// Lossy UTF-8 rendering of a body for error messages.
pub fn body_text(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}
