use reqwest::Client;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};

#[derive(Serialize)]
struct ChatRequest {
    pergunta: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    resposta: String,
}

/// HTTP client for the RAG backend: one `/chat` endpoint plus a liveness
/// probe against the server root.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send a question to the backend and return its answer.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let url = format!("{}/chat", self.base_url);

        let request = ChatRequest {
            pergunta: question.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "chat request failed with status: {}",
                response.status()
            ));
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response.resposta)
    }

    /// One-shot liveness probe against the backend root. Only a non-error
    /// response marks the service online; HTTP error statuses and transport
    /// failures both count as offline.
    pub async fn health(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::warn!("liveness probe returned status: {}", response.status());
                false
            }
            Err(err) => {
                log::warn!("liveness probe failed: {}", err);
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    pub fn http_ok(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
            body.len(),
            body
        )
    }

    pub fn http_error() -> String {
        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\n\r\n".to_string()
    }

    /// Bind an ephemeral port and answer every connection with the same
    /// canned HTTP response, optionally after a delay. Accepts in a loop so
    /// both the session's liveness probe and the chat request are served.
    /// Returns the base URL.
    pub async fn serve_once(response: String, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let response = response.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = stream.read(&mut buf).await;
                    tokio::time::sleep(delay).await;
                    let _ = stream.write_all(response.as_bytes()).await;
                });
            }
        });

        format!("http://{}", addr)
    }

    /// A base URL nothing is listening on.
    pub async fn dead_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }
}
