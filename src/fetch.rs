use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tracing::{info, warn};

const MAX_RETRIES: u32 = 3;

/// Download a (typically gzip-compressed) dump and return its decompressed
/// text. Fixed retry count, no backoff; fails hard once retries are
/// exhausted.
pub async fn download_text(url: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let mut last_err = None;

    for attempt in 1..=MAX_RETRIES {
        match try_download(&client, url).await {
            Ok(text) => {
                info!(url, chars = text.len(), "download complete");
                return Ok(text);
            }
            Err(e) => {
                warn!(url, attempt, max = MAX_RETRIES, error = %e, "download failed");
                last_err = Some(e);
            }
        }
    }

    Err(last_err
        .unwrap()
        .context(format!("download failed after {} attempts: {}", MAX_RETRIES, url)))
}

async fn try_download(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    text_from_bytes(&bytes)
}

/// Read one or more staged dump files, concatenated with newline separation.
/// Gzip files are detected by magic bytes and decompressed transparently.
pub fn read_raw_text(paths: &[PathBuf]) -> Result<String> {
    let mut parts = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes =
            fs::read(path).with_context(|| format!("reading input {}", path.display()))?;
        parts.push(text_from_bytes(&bytes)?);
    }
    Ok(parts.join("\n"))
}

/// The dump predates UTF-8 discipline, so decoding is lossy rather than
/// fatal.
fn text_from_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut decompressed = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut decompressed)
            .context("decompressing gzip stream")?;
        Ok(String::from_utf8_lossy(&decompressed).into_owned())
    } else {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(text: &str) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(text.as_bytes()).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn plain_bytes_pass_through() {
        assert_eq!(text_from_bytes(b"Id: 1\n").unwrap(), "Id: 1\n");
    }

    #[test]
    fn gzip_bytes_are_decompressed() {
        let bytes = gzip("Id: 1\nASIN: A\n");
        assert_eq!(text_from_bytes(&bytes).unwrap(), "Id: 1\nASIN: A\n");
    }

    #[test]
    fn truncated_gzip_is_an_error() {
        let mut bytes = gzip("Id: 1\n");
        bytes.truncate(6);
        assert!(text_from_bytes(&bytes).is_err());
    }

    #[test]
    fn multiple_inputs_are_newline_joined() {
        let dir = std::env::temp_dir().join(format!("amazon_meta_fetch_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let a = dir.join("a.txt");
        let b = dir.join("b.txt.gz");
        fs::write(&a, "Id: 1").unwrap();
        fs::write(&b, gzip("Id: 2")).unwrap();
        let text = read_raw_text(&[a, b]).unwrap();
        assert_eq!(text, "Id: 1\nId: 2");
        fs::remove_dir_all(&dir).ok();
    }
}
