//! macOS sendfile loop
//!
//! Apple's sendfile takes the source first, reports the bytes sent through
//! an out parameter and may send a partial amount even when it fails with
//! "would block" or "interrupted". The offset advances by whatever was sent
//! before the call is repeated.

use copybench_types::{ByteCount, Error, Result, RetryPolicy, Side};
use nix::errno::Errno;
use nix::libc::off_t;
use nix::sys::sendfile::sendfile;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, trace};

/// Transfer `size` bytes from `source_file` to `dest_file` with sendfile
pub fn sendfile_all(
    source_file: &File,
    source: &Path,
    dest_file: &File,
    destination: &Path,
    size: ByteCount,
    retry: RetryPolicy,
) -> Result<ByteCount> {
    let mut offset: off_t = 0;
    let mut retries = 0u32;

    while (offset as u64) < size {
        let remaining = size - offset as u64;
        let (result, sent) = sendfile(
            source_file,
            dest_file,
            offset,
            Some(remaining as off_t),
            None,
            None,
        );
        offset += sent;

        match result {
            Ok(()) => {
                if sent == 0 {
                    return Err(Error::io(
                        Side::Source,
                        source,
                        io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            format!(
                                "sendfile made no progress with {} bytes remaining",
                                remaining
                            ),
                        ),
                    ));
                }
                retries = 0;
            }
            Err(errno @ (Errno::EAGAIN | Errno::EINTR)) => {
                if sent > 0 {
                    retries = 0;
                } else if !retry.allows(retries) {
                    return Err(Error::io(
                        Side::Destination,
                        destination,
                        io::Error::new(
                            io::Error::from(errno).kind(),
                            format!("gave up after {} retries: {}", retries, errno),
                        ),
                    ));
                } else {
                    retries += 1;
                }
                trace!("sendfile {} after {} bytes, retrying", errno, sent);
            }
            Err(errno) => {
                return Err(Error::io(
                    Side::Destination,
                    destination,
                    io::Error::from(errno),
                ));
            }
        }
    }

    debug!("sendfile copied {} bytes", size);
    Ok(size)
}
