//! # Streaming JSON arrays
//!
//! Server-side streaming REST endpoints answer with one long JSON array whose
//! elements are objects, sent over time:
//!
//! ```text
//! [{"title": "first"},
//!  {"title": "second"}, ...
//! ```
//!
//! This library hands out each element as soon as its closing brace arrives,
//! without ever buffering the whole body. The transport may split the text
//! anywhere: inside a string, between a brace and a key, in the middle of a
//! multi-byte character. A [`BoundaryScanner`] tracks brace depth and string
//! state across those splits and queues the text of every completed object;
//! an [`ObjectDecoder`] turns that text into the caller's type.
//!
//! [`ResponseIterator`] drives the scanner from a blocking [`ChunkSource`];
//! [`ResponseStream`] does the same over any async stream of byte chunks.
//!
//! ## Example
//!
//! ```no_run
//! use rest_array_stream::{JsonDecoder, ResponseStream, StreamConfig};
//! use futures::StreamExt;
//! use tokio::sync::mpsc;
//! use tokio::time::{sleep, Duration};
//!
//! #[derive(Debug, serde::Deserialize)]
//! struct Song {
//!     title: String,
//!     year: u32,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a channel to simulate a response body arriving in pieces.
//!     let (tx, rx) = mpsc::channel::<Vec<u8>>(10);
//!     let mut songs =
//!         ResponseStream::from_channel(rx, JsonDecoder::<Song>::new(), StreamConfig::default());
//!
//!     tokio::spawn(async move {
//!         let body = r#"[{"title": "Clair de lune", "year": 1905},
//!                        {"title": "Gymnopédie", "year": 1888}]"#;
//!         for part in body.as_bytes().chunks(7) {
//!             tx.send(part.to_vec()).await.unwrap();
//!             sleep(Duration::from_millis(20)).await;
//!         }
//!     });
//!
//!     while let Some(song) = songs.next().await {
//!         println!("Parsed song: {:?}", song?);
//!     }
//!     Ok(())
//! }
//! ```

#[cfg(test)]
mod tests;

mod error;
pub use error::*;

mod scanner;
pub use scanner::*;

mod fragment;
pub use fragment::*;

mod source;
pub use source::*;

mod decoder;
pub use decoder::*;

mod config;
pub use self::config::*;

mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::gather_metrics;

mod pipeline;

mod iterator;
pub use iterator::*;

mod stream;
pub use stream::*;

#[cfg(feature = "http")]
mod connectors;
#[cfg(feature = "http")]
pub use connectors::*;
