use super::*;
use crate::service::{http::ReqwestFetcher, page::EmojiLocator};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const LIMIT: u64 = 1024;

/// Accepts one connection per response, in order, answering each with the raw bytes.
///
/// Returns the base URL of the listener.
async fn serve(responses: Vec<Vec<u8>>) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        for response in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            read_request_head(&mut socket).await;
            // The client may hang up early once it has seen enough
            let _ = socket.write_all(&response).await;
            let _ = socket.shutdown().await;
        }
    });

    Url::parse(&format!("http://{}/", addr)).unwrap()
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

fn http_response(status: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut response = format!("HTTP/1.1 {}\r\nConnection: close\r\n", status);
    for (name, value) in headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("\r\n");

    let mut bytes = response.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

/// A chunked response made of `chunks` chunks of `chunk_size` bytes each.
fn chunked_response(content_type: &str, chunks: usize, chunk_size: usize) -> Vec<u8> {
    let mut body = Vec::new();
    for _ in 0..chunks {
        body.extend_from_slice(format!("{:x}\r\n", chunk_size).as_bytes());
        body.extend(std::iter::repeat(b'a').take(chunk_size));
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(b"0\r\n\r\n");

    http_response(
        "200 OK",
        &[("Content-Type", content_type), ("Transfer-Encoding", "chunked")],
        &body,
    )
}

fn fetcher() -> ReqwestFetcher {
    ReqwestFetcher::new(reqwest::Client::new())
}

/// Tests a complete response under the ceiling.
///
/// Expected: Ok with the whole body, headers and the requested URL as final URL
#[tokio::test]
async fn reads_body_within_limit() -> Result<(), FetchError> {
    let png = image::png();
    let base = serve(vec![http_response(
        "200 OK",
        &[
            ("Content-Type", "image/png"),
            ("Content-Length", &png.len().to_string()),
        ],
        &png,
    )])
    .await;
    let url = base.join("x.png").unwrap();

    let response = fetcher().fetch(&url, Some(LIMIT)).await?;

    assert_eq!(response.final_url, url);
    assert_eq!(response.content_type.as_deref(), Some("image/png"));
    assert_eq!(response.content_length, Some(png.len() as u64));
    assert_eq!(response.body, png);
    assert!(!response.exceeded_limit);

    Ok(())
}

/// Tests a non-2xx answer.
///
/// Expected: Err(FetchError::Status(404))
#[tokio::test]
async fn non_success_status_is_status_error() {
    let base = serve(vec![http_response(
        "404 Not Found",
        &[("Content-Length", "9")],
        b"not found",
    )])
    .await;

    let result = fetcher().fetch(&base.join("missing").unwrap(), Some(LIMIT)).await;

    assert_eq!(result, Err(FetchError::Status(404)));
}

/// Tests a server that is not listening.
///
/// Expected: Err(FetchError::Network)
#[tokio::test]
async fn refused_connection_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{}/", addr)).unwrap();
    let result = fetcher().fetch(&url, None).await;

    assert!(matches!(result, Err(FetchError::Network(_))));
}

/// Tests a declared `Content-Length` over the ceiling.
///
/// Expected: exceeded_limit with an empty body; the payload is never read
#[tokio::test]
async fn declared_oversize_is_not_downloaded() -> Result<(), FetchError> {
    let base = serve(vec![http_response(
        "200 OK",
        &[("Content-Type", "image/png"), ("Content-Length", "100000")],
        &[0u8; 64],
    )])
    .await;

    let response = fetcher().fetch(&base.join("big.png").unwrap(), Some(LIMIT)).await?;

    assert!(response.exceeded_limit);
    assert!(response.body.is_empty());
    assert_eq!(response.content_length, Some(100_000));

    Ok(())
}

/// Tests a chunked body with no declared length that grows past the ceiling.
///
/// Expected: exceeded_limit, reading stopped soon after the ceiling was crossed
#[tokio::test]
async fn chunked_oversize_stops_reading() -> Result<(), FetchError> {
    let base = serve(vec![chunked_response("image/png", 64, 512)]).await;

    let response = fetcher().fetch(&base.join("big.png").unwrap(), Some(LIMIT)).await?;

    assert!(response.exceeded_limit);
    assert_eq!(response.content_length, None);
    assert!(response.body.len() as u64 > LIMIT);
    assert!(response.body.len() < 64 * 512);

    Ok(())
}

/// Tests a chunked body with no ceiling.
///
/// Expected: the whole body is read
#[tokio::test]
async fn unlimited_fetch_reads_everything() -> Result<(), FetchError> {
    let base = serve(vec![chunked_response("text/plain", 4, 512)]).await;

    let response = fetcher().fetch(&base, None).await?;

    assert!(!response.exceeded_limit);
    assert_eq!(response.body.len(), 4 * 512);

    Ok(())
}

/// Tests an emoji page that grows past the page ceiling over the wire.
///
/// Expected: Err(FetchError::TooLarge) instead of buffering the whole page
#[tokio::test]
async fn oversized_page_is_abandoned() {
    let base = serve(vec![chunked_response("text/html", 256, 1024)]).await;
    let scraper = PageScraper::new(Arc::new(fetcher()), DEFAULT_IMAGE_SELECTORS, 4096).unwrap();

    let result = scraper.locate_emoji_image(&base.join("emoji/x").unwrap()).await;

    assert!(matches!(
        result,
        Err(ImportError::FetchError(FetchError::TooLarge { limit: 4096 }))
    ));
}

/// Tests an emoji page that moved to another server.
///
/// Verifies the fetcher reports the URL that served the page and a root-relative
/// image resolves against it rather than against the requested URL.
///
/// Expected: image URL on the redirect target
#[tokio::test]
async fn redirected_page_resolves_against_final_url() -> Result<(), ImportError> {
    let html = page::emoji_page("/img/x.png", "x");
    let target = serve(vec![http_response(
        "200 OK",
        &[
            ("Content-Type", "text/html"),
            ("Content-Length", &html.len().to_string()),
        ],
        html.as_bytes(),
    )])
    .await;
    let moved_to = target.join("emoji/x").unwrap();
    let origin = serve(vec![http_response(
        "301 Moved Permanently",
        &[("Location", moved_to.as_str()), ("Content-Length", "0")],
        b"",
    )])
    .await;
    let scraper = PageScraper::new(
        Arc::new(fetcher()),
        DEFAULT_IMAGE_SELECTORS,
        DEFAULT_MAX_PAGE_BYTES,
    )
    .unwrap();

    let image = scraper
        .locate_emoji_image(&origin.join("emoji/x").unwrap())
        .await?;

    assert_eq!(image.url, target.join("img/x.png").unwrap());
    assert_ne!(image.url.port(), origin.port());

    Ok(())
}
