use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Secret used to sign session tokens. Taken from `JWT_SECRET` when not
    /// passed on the command line.
    pub jwt_secret: String,
    /// Origins allowed to make credentialed cross-origin requests.
    /// Same-origin and no-origin (server-to-server) calls always pass.
    pub allowed_origins: Vec<String>,
    /// Production deployments sit behind TLS and a cross-site frontend, so
    /// the session cookie gets `Secure; SameSite=None` instead of `SameSite=Lax`.
    pub production: bool,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("driveboard.db")
    }
}
