use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported command: {0:#04x}")]
    UnsupportedCommand(u8),

    #[error("unsupported address type: {0:#04x}")]
    UnsupportedAddressType(u8),

    #[error("address resolution failed: {0}")]
    AddressResolution(String),

    #[error("connect to {0} failed: {1}")]
    Dial(String, io::Error),

    #[error("{0} timed out")]
    Timeout(&'static str),
}
