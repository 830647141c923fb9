use super::*;

pub struct Socks5Listener {
    listener: TcpListener,
}

impl Socks5Listener {
    pub async fn listen<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        Ok(Self {
            listener: TcpListener::bind(addr).await?,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts in a loop, one task per session. Accept errors are logged
    /// and the loop keeps going; only failing to bind is fatal.
    pub async fn serve(mut self, phase_timeout: Duration) -> Result<()> {
        while let Some(next) = self.next().await {
            let (acceptor, client) = match next {
                Ok(x) => x,
                Err(e) => {
                    warn!("accept failed: {e}");
                    continue;
                }
            };

            tokio::spawn(async move {
                match acceptor.with_timeout(phase_timeout).accept().await {
                    Ok(_) => debug!("{client} closed"),
                    Err(e) => warn!("{client} error: {e}"),
                }
            });
        }

        Ok(())
    }
}

impl Stream for Socks5Listener {
    type Item = Result<(Socks5Acceptor, SocketAddr)>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let (stream, client) = match self.listener.poll_accept(cx) {
            Poll::Ready(t) => t,
            Poll::Pending => return Poll::Pending,
        }?;
        Poll::Ready(Some(Ok((Socks5Acceptor::new(stream, client), client))))
    }
}
