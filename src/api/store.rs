use reqwest::{Client, Response};

use super::err::AppError;
use super::student::{Student, StudentFields};

/// Client for the remote record store's `/users` resource.
///
/// No retries, no timeouts beyond the transport defaults and no
/// cancellation; callers decide what a failure means for their view.
#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Student>, AppError> {
        let url = format!("{}/users", self.base_url);
        let response = self.http.get(&url).send().await?;
        let response = check_status(response, "list students")?;
        Ok(response.json().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Student, AppError> {
        let url = format!("{}/users/{}", self.base_url, id);
        let response = self.http.get(&url).send().await?;
        let response = check_status(response, "get student")?;
        Ok(response.json().await?)
    }

    pub async fn create(&self, fields: &StudentFields) -> Result<Student, AppError> {
        let url = format!("{}/users", self.base_url);
        let response = self.http.post(&url).json(fields).send().await?;
        let response = check_status(response, "create student")?;
        Ok(response.json().await?)
    }

    pub async fn update(&self, id: &str, fields: &StudentFields) -> Result<Student, AppError> {
        let url = format!("{}/users/{}", self.base_url, id);
        let response = self.http.put(&url).json(fields).send().await?;
        let response = check_status(response, "update student")?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let url = format!("{}/users/{}", self.base_url, id);
        let response = self.http.delete(&url).send().await?;
        check_status(response, "delete student")?;
        Ok(())
    }
}

/// A non-2xx status is the store's only failure signal.
fn check_status(response: Response, op: &'static str) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        log::warn!("{}: store answered {}", op, status);
        Err(AppError::Status {
            op,
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// One-shot http server: answers each connection with the next canned
    /// response and hands back the raw requests it saw.
    async fn stub_store(
        responses: Vec<(&'static str, String)>,
    ) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                seen.push(read_request(&mut socket).await);
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
            seen
        });
        (format!("http://{}", addr), handle)
    }

    /// Read head plus content-length body so the client is never cut off
    /// mid-write.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut raw: Vec<u8> = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if let Some(head_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&raw[..head_end]).to_ascii_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).to_string()
    }

    fn record_json(id: &str, mssv: &str, hoten: &str, lop: &str, hinhanh: &str) -> String {
        format!(
            r#"{{"id":"{}","mssv":"{}","hoten":"{}","lop":"{}","hinhanh":"{}"}}"#,
            id, mssv, hoten, lop, hinhanh
        )
    }

    #[tokio::test]
    async fn test_list_keeps_store_order() {
        let body = format!(
            "[{},{}]",
            record_json("2", "SV02", "B", "C2", ""),
            record_json("1", "SV01", "A", "C1", "")
        );
        let (base_url, _server) = stub_store(vec![("200 OK", body)]).await;

        let students = StoreClient::new(&base_url).list().await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].id, "2");
        assert_eq!(students[1].id, "1");
    }

    #[tokio::test]
    async fn test_list_non_2xx_is_an_error() {
        let (base_url, _server) =
            stub_store(vec![("500 Internal Server Error", "{}".to_string())]).await;

        let result = StoreClient::new(&base_url).list().await;
        assert!(matches!(
            result,
            Err(AppError::Status {
                op: "list students",
                status: 500
            })
        ));
    }

    #[tokio::test]
    async fn test_get_targets_the_id_path() {
        let body = record_json("7", "SV01", "A", "C1", "");
        let (base_url, server) = stub_store(vec![("200 OK", body)]).await;

        let student = StoreClient::new(&base_url).get("7").await.unwrap();
        assert_eq!(student.mssv, "SV01");
        assert_eq!(student.hoten, "A");
        assert_eq!(student.lop, "C1");
        assert_eq!(student.hinhanh, "");

        let seen = server.await.unwrap();
        assert!(seen[0].starts_with("GET /users/7 "));
    }

    #[tokio::test]
    async fn test_create_sends_fields_without_id() {
        let created = record_json("10", "SV09", "Tran Duc Huy", "C3", "");
        let (base_url, server) = stub_store(vec![("201 Created", created)]).await;

        let fields = StudentFields::new(
            "SV09".to_string(),
            "Tran Duc Huy".to_string(),
            "C3".to_string(),
            String::new(),
        );
        let student = StoreClient::new(&base_url).create(&fields).await.unwrap();
        assert_eq!(student.id, "10");

        let seen = server.await.unwrap();
        assert!(seen[0].starts_with("POST /users "));
        assert!(seen[0].contains(r#""mssv":"SV09""#));
        assert!(!seen[0].contains(r#""id""#));
    }

    #[tokio::test]
    async fn test_update_is_idempotent_at_the_data_level() {
        let updated = record_json("7", "SV01", "A", "C1", "");
        let (base_url, server) =
            stub_store(vec![("200 OK", updated.clone()), ("200 OK", updated)]).await;

        let fields = StudentFields::new(
            "SV01".to_string(),
            "A".to_string(),
            "C1".to_string(),
            String::new(),
        );
        let client = StoreClient::new(&base_url);
        let first = client.update("7", &fields).await.unwrap();
        let second = client.update("7", &fields).await.unwrap();
        assert_eq!(StudentFields::from(first), fields);
        assert_eq!(StudentFields::from(second), fields);

        let seen = server.await.unwrap();
        assert!(seen.iter().all(|req| req.starts_with("PUT /users/7 ")));
    }

    #[tokio::test]
    async fn test_delete_accepts_any_2xx() {
        let (base_url, _server) = stub_store(vec![("204 No Content", String::new())]).await;
        assert!(StoreClient::new(&base_url).delete("42").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_non_2xx_is_an_error() {
        let (base_url, _server) = stub_store(vec![("404 Not Found", "{}".to_string())]).await;
        let result = StoreClient::new(&base_url).delete("42").await;
        assert!(matches!(
            result,
            Err(AppError::Status {
                op: "delete student",
                status: 404
            })
        ));
    }
}
