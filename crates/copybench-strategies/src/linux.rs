//! Linux-specific transfer loops
//!
//! `sendfile` for the kernel transfer strategy and `splice` through a pipe
//! for the splice strategy. Both loops treat a call that moves zero bytes
//! before the expected length is reached as a hard failure.

use crate::retry::retry_transient;
use copybench_types::{ByteCount, Error, Result, RetryPolicy, Side};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, trace};

/// Largest length a single sendfile call will transfer on Linux
pub const MAX_TRANSFER_CHUNK: u64 = 0x7fff_f000;

/// Label used for errors on the intermediate pipe
const PIPE_LABEL: &str = "<pipe>";

fn no_progress(what: &str, remaining: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("{} made no progress with {} bytes remaining", what, remaining),
    )
}

/// Transfer `size` bytes from `source_file` to `dest_file` with sendfile
#[cfg(feature = "kernel-transfer")]
pub fn sendfile_all(
    source_file: &File,
    source: &Path,
    dest_file: &File,
    destination: &Path,
    size: ByteCount,
    retry: RetryPolicy,
) -> Result<ByteCount> {
    use nix::libc::off_t;
    use nix::sys::sendfile::sendfile;

    let mut offset: off_t = 0;
    let mut calls = 0u64;

    while (offset as u64) < size {
        let remaining = size - offset as u64;
        let count = remaining.min(MAX_TRANSFER_CHUNK) as usize;

        let sent = retry_transient(retry, || {
            sendfile(dest_file, source_file, Some(&mut offset), count).map_err(io::Error::from)
        })
        .map_err(|e| Error::io(Side::Destination, destination, e))?;

        if sent == 0 {
            return Err(Error::io(
                Side::Source,
                source,
                no_progress("sendfile", remaining),
            ));
        }
        calls += 1;
        trace!("sendfile moved {} bytes, offset now {}", sent, offset);
    }

    debug!("sendfile copied {} bytes in {} calls", size, calls);
    Ok(size)
}

/// Transfer `size` bytes from `source_file` to `dest_file` through a pipe
///
/// Every round moves at most `chunk_size` bytes into the pipe and drains
/// exactly what went in before the next round.
#[cfg(feature = "splice")]
pub fn splice_all(
    source_file: &File,
    source: &Path,
    dest_file: &File,
    destination: &Path,
    size: ByteCount,
    chunk_size: usize,
    retry: RetryPolicy,
) -> Result<ByteCount> {
    use nix::fcntl::{splice, SpliceFFlags};
    use nix::unistd::pipe;

    let (pipe_read, pipe_write) =
        pipe().map_err(|e| Error::io(Side::Pipe, PIPE_LABEL, io::Error::from(e)))?;

    let mut bytes_remaining = size;
    let mut rounds = 0u64;

    while bytes_remaining > 0 {
        let to_move = bytes_remaining.min(chunk_size as u64) as usize;

        let moved_in = retry_transient(retry, || {
            splice(
                source_file,
                None,
                &pipe_write,
                None,
                to_move,
                SpliceFFlags::SPLICE_F_MOVE,
            )
            .map_err(io::Error::from)
        })
        .map_err(|e| Error::io(Side::Source, source, e))?;

        if moved_in == 0 {
            return Err(Error::io(
                Side::Source,
                source,
                no_progress("splice into pipe", bytes_remaining),
            ));
        }

        let mut moved_out = 0usize;
        while moved_out < moved_in {
            let pending = moved_in - moved_out;
            let written = retry_transient(retry, || {
                splice(
                    &pipe_read,
                    None,
                    dest_file,
                    None,
                    pending,
                    SpliceFFlags::SPLICE_F_MOVE,
                )
                .map_err(io::Error::from)
            })
            .map_err(|e| Error::io(Side::Destination, destination, e))?;

            if written == 0 {
                return Err(Error::io(
                    Side::Destination,
                    destination,
                    no_progress("splice out of pipe", pending as u64),
                ));
            }
            moved_out += written;
        }

        bytes_remaining -= moved_in as u64;
        rounds += 1;
    }

    debug!(
        "splice copied {} bytes in {} rounds of up to {} bytes",
        size, rounds, chunk_size
    );
    Ok(size)
}
