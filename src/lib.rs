use std::fmt::{self, Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpListener, TcpStream, ToSocketAddrs};
use tokio::time::timeout;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

pub use self::{
    acceptor::Socks5Acceptor,
    connector::Socks5Connector,
    error::{Error, Result},
    listener::Socks5Listener,
    target::{Socks5Host, Socks5Target},
};

mod acceptor;
mod connector;
mod error;
mod listener;
mod target;
pub mod util;
