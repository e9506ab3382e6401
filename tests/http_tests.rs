use anyhow::Result;
use atp::http::{execute, ExecuteError};
use atp::resolve::resolve;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Serves one canned response and hands back the raw request it received
async fn serve_once(response: &'static str) -> Result<(String, JoinHandle<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });
    Ok((format!("http://{}/v2/skyatp", addr), handle))
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if request_complete(&buf) {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn request_complete(buf: &[u8]) -> bool {
    let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
    let body = &buf[end + 4..];

    if let Some(line) = head.lines().find(|l| l.starts_with("content-length:")) {
        let expected: usize = line["content-length:".len()..].trim().parse().unwrap_or(0);
        return body.len() >= expected;
    }
    if head.contains("transfer-encoding: chunked") {
        return body.ends_with(b"0\r\n\r\n");
    }
    true
}

#[tokio::test]
async fn test_ping_success() -> Result<()> {
    let (base_uri, server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Length: 14\r\nConnection: close\r\n\r\nI am a potato.",
    )
    .await?;

    let intent = resolve(["atp", "-p", "--base-uri", base_uri.as_str()])?;
    let response = execute(&intent).await?;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"I am a potato.");

    let request = server.await?.to_ascii_lowercase();
    assert!(request.starts_with("get /v2/skyatp/ping http/1.1"));
    assert!(!request.contains("authorization:"));

    Ok(())
}

#[tokio::test]
async fn test_add_sends_bearer_and_form() -> Result<()> {
    let (base_uri, server) = serve_once(
        "HTTP/1.1 202 Accepted\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
    )
    .await?;

    let intent = resolve([
        "atp",
        "-a",
        "add",
        "-l",
        "allowlist",
        "-D",
        "example.com",
        "-t",
        "secret-token",
        "--base-uri",
        base_uri.as_str(),
    ])?;
    let response = execute(&intent).await?;
    assert_eq!(response.status, 202);
    assert_eq!(response.body, b"{}");

    let request = server.await?;
    let lower = request.to_ascii_lowercase();
    assert!(lower.starts_with("patch /v2/skyatp/whitelist/param/domain http/1.1"));
    assert!(lower.contains("authorization: bearer secret-token"));
    assert!(lower.contains("content-type: multipart/form-data"));
    assert!(request.contains(r#"name="server""#));
    assert!(request.contains("example.com"));

    Ok(())
}

#[tokio::test]
async fn test_not_found_is_an_api_error() -> Result<()> {
    let (base_uri, server) = serve_once(
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await?;

    let hash = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    let intent = resolve(["atp", "-H", hash, "-t", "tok", "--base-uri", base_uri.as_str()])?;
    let err = execute(&intent).await.unwrap_err();
    assert!(matches!(err, ExecuteError::Status { status: 404, .. }));
    assert_eq!(err.to_string(), "404 received: Page not found");

    let request = server.await?.to_ascii_lowercase();
    assert!(request.starts_with(&format!("get /v2/skyatp/lookup/hash/{} http/1.1", hash)));

    Ok(())
}

#[tokio::test]
async fn test_undocumented_status_has_empty_description() -> Result<()> {
    let (base_uri, _server) = serve_once(
        "HTTP/1.1 201 Created\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await?;

    let intent = resolve(["atp", "-I", "-t", "tok", "--base-uri", base_uri.as_str()])?;
    let err = execute(&intent).await.unwrap_err();
    assert_eq!(err.to_string(), "201 received: ");

    Ok(())
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_error() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let base_uri = format!("http://{}/v2/skyatp", addr);
    let intent = resolve(["atp", "-p", "--base-uri", base_uri.as_str()])?;
    let err = execute(&intent).await.unwrap_err();
    assert!(matches!(err, ExecuteError::Transport(_)));

    Ok(())
}
