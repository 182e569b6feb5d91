//! A single GET attempt, streamed to a temp file next to the destination.

use super::FetchOptions;
use crate::retry::FetchError;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Downloads `url` into `destination`. Returns the number of body bytes written.
///
/// The body is written chunk by chunk into a hidden temp file in the destination
/// directory and renamed into place only after a 2xx status, so a failed attempt
/// never leaves a partial image under the final name.
pub(super) fn download_to(
    url: &str,
    destination: &Path,
    options: &FetchOptions,
) -> Result<u64, FetchError> {
    let dir = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut part = tempfile::Builder::new()
        .prefix(".pinfetch-")
        .suffix(".part")
        .tempfile_in(dir)?;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.low_speed_limit(1)?;
    easy.low_speed_time(options.read_timeout)?;
    easy.useragent(&options.user_agent)?;
    if let Some(proxy) = &options.proxy {
        easy.proxy(proxy)?;
    }

    let mut written = 0u64;
    let mut write_error: Option<io::Error> = None;
    let performed = {
        let file = part.as_file_mut();
        let mut transfer = easy.transfer();
        transfer.write_function(|data| match file.write_all(data) {
            Ok(()) => {
                written += data.len() as u64;
                Ok(data.len())
            }
            Err(e) => {
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.perform()
    };
    if let Some(e) = write_error {
        return Err(FetchError::Storage(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }

    part.as_file().sync_all()?;
    part.persist(destination).map_err(|e| FetchError::Storage(e.error))?;
    Ok(written)
}
