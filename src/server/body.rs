use actix_web::web::Bytes;
use futures::{Stream, StreamExt};
use std::fmt::Display;

use crate::error::{RelayError, Result};

/// Buffer a request body into a string, failing fast once it grows past `limit` bytes.
///
/// On overflow the remaining stream is not polled again; the caller's error
/// response closes the connection.
pub async fn read_body<S, E>(mut stream: S, limit: usize) -> Result<String>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: Display,
{
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| RelayError::BodyRead(e.to_string()))?;
        if buffer.len() + chunk.len() > limit {
            return Err(RelayError::PayloadTooLarge);
        }
        buffer.extend_from_slice(&chunk);
    }

    String::from_utf8(buffer).map_err(|e| RelayError::BodyRead(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::io;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = io::Result<Bytes>> + Unpin {
        stream::iter(
            parts
                .iter()
                .copied()
                .map(|p| Ok::<_, io::Error>(Bytes::from_static(p.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn concatenates_chunks() {
        let body = read_body(chunks(&["{\"prompt\":", "\"owl\"}"]), 100)
            .await
            .unwrap();
        assert_eq!(body, "{\"prompt\":\"owl\"}");
    }

    #[tokio::test]
    async fn empty_stream_is_empty_string() {
        assert_eq!(read_body(chunks(&[]), 10).await.unwrap(), "");
    }

    #[tokio::test]
    async fn exactly_at_limit_is_accepted() {
        let body = read_body(chunks(&["12345", "67890"]), 10).await.unwrap();
        assert_eq!(body.len(), 10);
    }

    #[tokio::test]
    async fn over_limit_is_payload_too_large() {
        let err = read_body(chunks(&["12345", "678901"]), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::PayloadTooLarge));
    }

    #[tokio::test]
    async fn stops_reading_after_overflow() {
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"0123456789ab")),
            Err(io::Error::new(io::ErrorKind::Other, "never reached")),
        ]);
        let err = read_body(source, 10).await.unwrap_err();
        assert!(matches!(err, RelayError::PayloadTooLarge));
    }

    #[tokio::test]
    async fn stream_error_is_body_read() {
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"{\"pro")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")),
        ]);
        let err = read_body(source, 100).await.unwrap_err();
        match err {
            RelayError::BodyRead(message) => assert!(message.contains("reset by peer")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_utf8_is_body_read() {
        let source = stream::iter(vec![Ok::<_, io::Error>(Bytes::from_static(&[0xff, 0xfe]))]);
        let err = read_body(source, 100).await.unwrap_err();
        assert!(matches!(err, RelayError::BodyRead(_)));
    }
}
