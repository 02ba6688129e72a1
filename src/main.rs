use futures::StreamExt;
use rest_array_stream::{RawDecoder, ResponseStream, StreamConfig};
use tokio::io::AsyncWriteExt;

/// Reads a JSON array of objects on stdin and writes each element on its own
/// line as soon as it is complete, turning a streamed array into NDJSON.
///
/// An optional first argument sets how many bytes are read at a time.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StreamConfig::default();
    if let Some(read_size) = std::env::args().nth(1) {
        config.read_size = read_size.parse()?;
    }

    let mut objects = ResponseStream::from_async_read(tokio::io::stdin(), RawDecoder, config);
    let mut stdout = tokio::io::stdout();

    while let Some(object) = objects.next().await {
        let mut line = object?;
        line.push('\n');
        stdout.write_all(line.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Objects come out one per line, whatever the read size.
    #[tokio::test]
    async fn test_array_to_lines() {
        let body = b"[ {\"a\": 1},\n {\"b\": \"x y\"} ]".to_vec();
        for read_size in [1, 3, 64] {
            let config = StreamConfig {
                read_size,
                ..Default::default()
            };
            let objects: Vec<String> =
                ResponseStream::from_async_read(Cursor::new(body.clone()), RawDecoder, config)
                    .map(|object| object.unwrap())
                    .collect()
                    .await;
            assert_eq!(objects, vec!["{\"a\":1}", "{\"b\":\"x y\"}"]);
        }
    }
}
