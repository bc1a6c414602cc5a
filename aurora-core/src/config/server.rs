use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Origins allowed by CORS. Empty allows any origin.
    pub allowed_origins: Vec<String>,
    /// Where the buyer is sent back after checkout when the request carries
    /// no `Origin` header.
    pub frontend_url: String,
}

impl ServerConfig {
    /// Check if the given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == origin)
    }

    /// Origin used to build checkout return URLs.
    pub fn return_origin<'a>(&'a self, request_origin: Option<&'a str>) -> &'a str {
        match request_origin {
            Some(origin) if self.is_origin_allowed(origin) => origin,
            _ => &self.frontend_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(allowed: &[&str]) -> ServerConfig {
        ServerConfig {
            listen: SocketAddr::from(([127, 0, 0, 1], 5000)),
            allowed_origins: allowed.iter().map(|o| o.to_string()).collect(),
            frontend_url: "https://shop.example.com".to_string(),
        }
    }

    #[test]
    fn test_empty_allow_list_accepts_any_origin() {
        assert!(config(&[]).is_origin_allowed("https://anything.example"));
    }

    #[test]
    fn test_return_origin() {
        let config = config(&["https://shop.example.com", "http://localhost:3000"]);
        assert_eq!(
            config.return_origin(Some("http://localhost:3000")),
            "http://localhost:3000"
        );
        assert_eq!(
            config.return_origin(Some("https://evil.example")),
            "https://shop.example.com"
        );
        assert_eq!(config.return_origin(None), "https://shop.example.com");
    }
}
