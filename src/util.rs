#[cfg(target_family = "unix")]
use std::io;
#[cfg(target_family = "unix")]
use std::mem::MaybeUninit;
use std::net::{Ipv4Addr, SocketAddrV4};

use socket2::{Domain, Protocol, Socket, Type};

use crate::error::{Error, Result};

/// The advertised local IPv4 address, discovered through a connected UDP
/// probe socket. Connecting a datagram socket sends nothing; the kernel
/// just selects the outbound interface and source address for the
/// destination.
pub fn find_local_ipv4() -> Result<Ipv4Addr> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.connect(&SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), 53).into())?;

    match socket.local_addr()?.as_socket_ipv4() {
        Some(x) if !x.ip().is_loopback() && !x.ip().is_unspecified() => Ok(*x.ip()),
        _ => Err(Error::AddressResolution(
            "no non-loopback ipv4 interface".into(),
        )),
    }
}

#[cfg(target_family = "unix")]
pub fn set_rlimit_nofile(limit: libc::rlim_t) -> Result<()> {
    unsafe {
        let mut rlimit = MaybeUninit::uninit();
        if libc::getrlimit(libc::RLIMIT_NOFILE, rlimit.as_mut_ptr()) != 0 {
            return Err(io::Error::last_os_error().into());
        }
        let mut rlimit = rlimit.assume_init();

        if rlimit.rlim_cur < limit {
            rlimit.rlim_cur = limit;
            if libc::setrlimit(libc::RLIMIT_NOFILE, &rlimit) != 0 {
                return Err(io::Error::last_os_error().into());
            }
        }
    }

    Ok(())
}
