use super::*;

pub struct Socks5Connector {
    target: Socks5Target,
}

impl Socks5Connector {
    pub fn new(target: Socks5Target) -> Self {
        Self { target }
    }

    pub async fn connect(self) -> Result<TcpStream> {
        let addr = self.target.resolve().await?;
        TcpStream::connect(addr)
            .await
            .map_err(|e| Error::Dial(self.target.to_string(), e))
    }
}
