/// Nginx server block proxying one domain to the Immich
/// server, with WebSocket upgrades.
///
/// # Example
///
/// ```
/// use immich_bootstrap::VirtualHost;
///
/// let vhost = VirtualHost::new("photos.example.com")
///     .upstream("http://127.0.0.1:2283")
///     .client_max_body_size("10G");
///
/// let conf = vhost.render();
/// assert!(conf.contains("server_name photos.example.com;"));
/// assert!(conf.contains("proxy_pass http://127.0.0.1:2283;"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualHost {
    pub domain: String,
    pub upstream: String,
    pub client_max_body_size: String,
    pub listen: u16,
}

impl VirtualHost {
    #[must_use]
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            upstream: "http://localhost:2283".to_string(),
            client_max_body_size: "50000M".to_string(),
            listen: 80,
        }
    }

    #[must_use]
    pub fn upstream(mut self, upstream: &str) -> Self {
        self.upstream = upstream.to_string();
        self
    }

    #[must_use]
    pub fn client_max_body_size(mut self, size: &str) -> Self {
        self.client_max_body_size = size.to_string();
        self
    }

    #[must_use]
    pub const fn listen(mut self, port: u16) -> Self {
        self.listen = port;
        self
    }

    /// Render the server block as written to `sites-available`.
    #[must_use]
    pub fn render(&self) -> String {
        let Self {
            domain,
            upstream,
            client_max_body_size,
            listen,
        } = self;

        format!(
            "\
server {{
    listen {listen};
    listen [::]:{listen};

    server_name {domain};

    client_max_body_size {client_max_body_size};

    location / {{
        proxy_pass {upstream};
        proxy_set_header Host              $http_host;
        proxy_set_header X-Real-IP         $remote_addr;
        proxy_set_header X-Forwarded-For   $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;

        # http://nginx.org/en/docs/http/websocket.html
        proxy_http_version 1.1;
        proxy_set_header   Upgrade    $http_upgrade;
        proxy_set_header   Connection \"upgrade\";
        proxy_redirect off;
    }}
}}
"
        )
    }
}
