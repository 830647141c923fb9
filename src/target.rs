use super::*;

#[derive(Debug)]
pub enum Socks5Host {
    Ip(IpAddr),
    Domain(String),
}

#[derive(Debug)]
pub struct Socks5Target {
    pub host: Socks5Host,
    pub port: u16,
}

impl Display for Socks5Host {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Socks5Host::Ip(x) => x.fmt(f),
            Socks5Host::Domain(x) => x.fmt(f),
        }
    }
}

impl Display for Socks5Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl Socks5Target {
    fn parse_ipv4(data: &[u8]) -> Result<Self> {
        if data.len() != 6 {
            return Err(Error::AddressResolution(format!(
                "ipv4 address expects 6 bytes, got {}",
                data.len()
            )));
        }
        let ip = Ipv4Addr::new(data[0], data[1], data[2], data[3]);
        let port = u16::from_be_bytes([data[4], data[5]]);
        Ok(Self {
            host: Socks5Host::Ip(ip.into()),
            port,
        })
    }

    fn parse_ipv6(data: &[u8]) -> Result<Self> {
        if data.len() != 18 {
            return Err(Error::AddressResolution(format!(
                "ipv6 address expects 18 bytes, got {}",
                data.len()
            )));
        }
        let mut octets = [0; 16];
        octets.copy_from_slice(&data[..16]);
        let port = u16::from_be_bytes([data[16], data[17]]);
        Ok(Self {
            host: Socks5Host::Ip(Ipv6Addr::from(octets).into()),
            port,
        })
    }

    fn parse_domain(data: &[u8]) -> Result<Self> {
        if data.is_empty() || data.len() != 3 + data[0] as usize {
            return Err(Error::AddressResolution(format!(
                "domain address expects {} bytes, got {}",
                data.first().map_or(1, |&x| 3 + x as usize),
                data.len()
            )));
        }
        let len = data.len();
        let domain = String::from_utf8(data[1..len - 2].into())
            .map_err(|e| Error::AddressResolution(format!("invalid domain: {e}")))?;
        let port = u16::from_be_bytes([data[len - 2], data[len - 1]]);
        Ok(Self {
            host: Socks5Host::Domain(domain),
            port,
        })
    }

    /// Length of the `[atyp][addr...][port]` tail, given its first two bytes.
    pub fn target_len(data: &[u8]) -> Result<usize> {
        if data.len() < 2 {
            return Err(Error::AddressResolution("truncated address".into()));
        }
        match data[0] {
            1 => Ok(7),
            4 => Ok(19),
            3 => Ok(4 + data[1] as usize),
            t => Err(Error::UnsupportedAddressType(t)),
        }
    }

    /// IP targets pass through untouched; domains are looked up on every
    /// call, keeping the first IPv4 result. A domain that only resolves
    /// to IPv6 addresses is treated as a resolution failure.
    pub async fn resolve(&self) -> Result<SocketAddr> {
        match &self.host {
            Socks5Host::Ip(x) => Ok(SocketAddr::new(*x, self.port)),
            Socks5Host::Domain(x) => {
                let mut addrs = lookup_host((x.as_str(), self.port))
                    .await
                    .map_err(|e| Error::AddressResolution(format!("{x}: {e}")))?;
                addrs
                    .find(|x| x.is_ipv4())
                    .ok_or_else(|| Error::AddressResolution(format!("{x}: no ipv4 address")))
            }
        }
    }
}

impl TryFrom<&[u8]> for Socks5Target {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::AddressResolution("empty address".into()));
        }
        match data[0] {
            1 => Self::parse_ipv4(&data[1..]),
            4 => Self::parse_ipv6(&data[1..]),
            3 => Self::parse_domain(&data[1..]),
            t => Err(Error::UnsupportedAddressType(t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_target() {
        let target = Socks5Target::try_from(&[1, 127, 0, 0, 1, 0, 80][..]).unwrap();
        assert!(matches!(target.host, Socks5Host::Ip(x) if x == IpAddr::V4(Ipv4Addr::LOCALHOST)));
        assert_eq!(target.port, 80);
        assert_eq!(target.to_string(), "127.0.0.1:80");
    }

    #[test]
    fn ipv6_target() {
        let mut data = vec![4];
        data.extend_from_slice(&Ipv6Addr::LOCALHOST.octets());
        data.extend_from_slice(&443u16.to_be_bytes());
        let target = Socks5Target::try_from(&data[..]).unwrap();
        assert_eq!(target.to_string(), "::1:443");
    }

    #[test]
    fn domain_target() {
        let mut data = vec![3, 11];
        data.extend_from_slice(b"example.com");
        data.extend_from_slice(&[0x01, 0xbb]);
        let target = Socks5Target::try_from(&data[..]).unwrap();
        assert!(matches!(&target.host, Socks5Host::Domain(x) if x == "example.com"));
        assert_eq!(target.port, 443);
    }

    #[test]
    fn port_is_big_endian() {
        let target = Socks5Target::try_from(&[1, 10, 0, 0, 1, 0x1f, 0x90][..]).unwrap();
        assert_eq!(target.port, 8080);
    }

    #[test]
    fn unknown_address_type() {
        let err = Socks5Target::try_from(&[2, 0, 0, 0, 0, 0, 0][..]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAddressType(2)));
    }

    #[test]
    fn truncated_address() {
        assert!(Socks5Target::try_from(&[1, 127, 0, 0, 1, 0][..]).is_err());
        assert!(Socks5Target::try_from(&[4, 0, 0][..]).is_err());
        assert!(Socks5Target::try_from(&[3, 5, b'a', 0, 80][..]).is_err());
    }

    #[test]
    fn invalid_domain_utf8() {
        let err = Socks5Target::try_from(&[3, 2, 0xff, 0xfe, 0, 80][..]).unwrap_err();
        assert!(matches!(err, Error::AddressResolution(_)));
    }

    #[test]
    fn target_len_by_address_type() {
        assert_eq!(Socks5Target::target_len(&[1, 0]).unwrap(), 7);
        assert_eq!(Socks5Target::target_len(&[4, 0]).unwrap(), 19);
        assert_eq!(Socks5Target::target_len(&[3, 5]).unwrap(), 9);
        assert!(matches!(
            Socks5Target::target_len(&[9, 0]),
            Err(Error::UnsupportedAddressType(9))
        ));
    }

    #[tokio::test]
    async fn resolve_ipv4_without_lookup() {
        let target = Socks5Target::try_from(&[1, 127, 0, 0, 1, 0, 80][..]).unwrap();
        assert_eq!(target.resolve().await.unwrap(), "127.0.0.1:80".parse().unwrap());
    }

    #[tokio::test]
    async fn resolve_unknown_domain_fails() {
        let target = Socks5Target {
            host: Socks5Host::Domain("nonexistent.invalid".into()),
            port: 80,
        };
        assert!(matches!(
            target.resolve().await,
            Err(Error::AddressResolution(_))
        ));
    }
}
