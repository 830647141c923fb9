use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use indoc::indoc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sock5r::util::find_local_ipv4;
#[cfg(target_family = "unix")]
use sock5r::util::set_rlimit_nofile;
use sock5r::{Result, Socks5Listener};

const DEFAULT_PORT: u16 = 8081;

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    help_template = indoc! {"
        {before-help}{name} {version}
        {about}

        {usage-heading} {usage}

        {all-args}{after-help}
    "}
)]
struct Cli {
    #[arg(
        short = 'l',
        long = "listen",
        value_name = "HOST:PORT",
        help = "Listen address [default: the discovered local IPv4 address on port 8081]"
    )]
    listen: Option<SocketAddr>,

    #[arg(
        short = 't',
        long = "timeout",
        value_name = "SECONDS",
        default_value_t = 30,
        help = "Timeout for the negotiation, command and connect phases"
    )]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let listen = cli.listen.unwrap_or_else(|| {
        let ip = match find_local_ipv4() {
            Ok(x) => IpAddr::V4(x),
            Err(e) => {
                warn!("local address discovery failed ({e}), falling back to loopback");
                IpAddr::V4(Ipv4Addr::LOCALHOST)
            }
        };
        SocketAddr::new(ip, DEFAULT_PORT)
    });

    #[cfg(target_family = "unix")]
    let _ = set_rlimit_nofile(4096);

    let listener = Socks5Listener::listen(listen).await?;
    info!("listening on {listen}");

    listener.serve(Duration::from_secs(cli.timeout)).await
}
