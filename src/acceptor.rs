use super::*;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Socks5Acceptor {
    stream: TcpStream,
    peer: SocketAddr,
    buf: Vec<u8>,
    timeout: Duration,
}

impl Socks5Acceptor {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            stream,
            peer,
            buf: Vec::with_capacity(64),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Applies to the negotiation, command and connect phases; the relay
    /// itself is never timed out.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub async fn authenticate(&mut self) -> Result<()> {
        self.buf.resize(2, 0);
        self.stream.read_exact(&mut self.buf).await?;

        // The version byte is not enforced, and the offered method list is
        // read but ignored: the only negotiable method is "no
        // authentication required".
        self.buf.resize(2 + self.buf[1] as usize, 0);
        self.stream.read_exact(&mut self.buf[2..]).await?;

        self.stream.write_all(b"\x05\x00").await?;
        Ok(())
    }

    pub async fn accept_command(&mut self) -> Result<&[u8]> {
        self.buf.resize(5, 0);
        self.stream.read_exact(&mut self.buf).await?;

        let len = match Socks5Target::target_len(&self.buf[3..]) {
            Ok(x) => x + 3,
            Err(e) => {
                self.closed(0x08).await?;
                return Err(e);
            }
        };

        self.buf.resize(len, 0);
        self.stream.read_exact(&mut self.buf[5..]).await?;

        if self.buf[1] != 1 {
            self.closed(0x07).await?;
            return Err(Error::UnsupportedCommand(self.buf[1]));
        }

        Ok(&self.buf[3..])
    }

    pub async fn accept(mut self) -> Result<()> {
        let phase = self.timeout;
        timeout(phase, self.authenticate())
            .await
            .map_err(|_| Error::Timeout("negotiation"))??;

        let target = {
            let data = timeout(phase, self.accept_command())
                .await
                .map_err(|_| Error::Timeout("command"))??;
            Socks5Target::try_from(data)?
        };
        debug!("{} -> {}", self.peer, target);

        let upstream = timeout(phase, Socks5Connector::new(target).connect())
            .await
            .map_err(|_| Error::Timeout("connect"))??;

        self.connected(upstream.local_addr()?).await?;
        self.relay(upstream).await
    }

    /// The bound address reported back is the local address of the
    /// outbound connection. The reply's address slot is fixed to the
    /// IPv4 form, so an IPv6 local address is reported as 0.0.0.0.
    pub async fn connected(&mut self, bound: SocketAddr) -> Result<()> {
        let ip = match bound.ip() {
            IpAddr::V4(x) => x,
            IpAddr::V6(_) => Ipv4Addr::UNSPECIFIED,
        };

        let mut reply = b"\x05\x00\x00\x01".to_vec();
        reply.extend_from_slice(&ip.octets());
        reply.extend_from_slice(&bound.port().to_be_bytes());
        self.stream.write_all(&reply).await?;
        Ok(())
    }

    pub async fn closed(&mut self, resp: u8) -> Result<()> {
        // resp:
        //   0x00 succeeded
        //   0x01 general SOCKS server failure
        //   0x02 connection not allowed by ruleset
        //   0x03 Network unreachable
        //   0x04 Host unreachable
        //   0x05 Connection refused
        //   0x06 TTL expired
        //   0x07 Command not supported
        //   0x08 Address type not supported
        //   0x09 to 0xff unassigned
        let mut reply = vec![0x05, resp, 0x00, 0x01];
        reply.extend_from_slice(&[0; 6]);
        self.stream.write_all(&reply).await?;
        Ok(())
    }

    async fn relay(mut self, mut upstream: TcpStream) -> Result<()> {
        tokio::io::copy_bidirectional(&mut self.stream, &mut upstream).await?;
        Ok(())
    }
}
