//! Mapping between filesystem paths and `file://` URIs.
//!
//! A URI is `file://` followed by the absolute path with every byte
//! percent-encoded except unreserved characters (`A-Z a-z 0-9 - . _ ~`) and
//! `/`. The mapping is deterministic, so a URI can be used as a map key.
//! On Unix the raw path bytes are encoded; non-UTF-8 paths round-trip.

use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str};

use crate::error::{Error, Result};

const SCHEME: &str = "file://";

/// Bytes escaped in the path component.
const PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Windows drive letters keep their colon (`file:///C:/src/app.py`).
#[cfg(windows)]
const WINDOWS_PATH: &AsciiSet = &PATH.remove(b':');

/// Build the URI of an absolute path.
#[must_use]
pub fn path_to_uri(path: &Path) -> String {
    format!("{SCHEME}{}", encode_path(path))
}

/// Recover the path a `file://` URI names.
///
/// # Errors
///
/// Returns `Error::InvalidUri` for other schemes, URIs with a host, and
/// paths that don't decode.
pub fn uri_to_path(uri: &str) -> Result<PathBuf> {
    let encoded = uri
        .strip_prefix(SCHEME)
        .ok_or_else(|| Error::InvalidUri(uri.to_string()))?;
    // `file://localhost/x` is the same file as `file:///x`.
    let encoded = encoded.strip_prefix("localhost").unwrap_or(encoded);
    if !encoded.starts_with('/') {
        return Err(Error::InvalidUri(uri.to_string()));
    }
    decode_path(encoded).ok_or_else(|| Error::InvalidUri(uri.to_string()))
}

#[cfg(unix)]
fn encode_path(path: &Path) -> String {
    use percent_encoding::percent_encode;
    use std::os::unix::ffi::OsStrExt;

    percent_encode(path.as_os_str().as_bytes(), PATH).to_string()
}

#[cfg(unix)]
fn decode_path(encoded: &str) -> Option<PathBuf> {
    use std::borrow::Cow;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let bytes: Cow<'_, [u8]> = percent_decode_str(encoded).into();
    Some(PathBuf::from(OsStr::from_bytes(&bytes)))
}

#[cfg(windows)]
fn encode_path(path: &Path) -> String {
    use percent_encoding::utf8_percent_encode;

    let slashed = path.to_string_lossy().replace('\\', "/");
    let rooted = if slashed.starts_with('/') {
        slashed
    } else {
        format!("/{slashed}")
    };
    utf8_percent_encode(&rooted, WINDOWS_PATH).to_string()
}

#[cfg(windows)]
fn decode_path(encoded: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(encoded).decode_utf8().ok()?;
    // `/C:/src` -> `C:/src`
    let trimmed = match decoded.as_bytes() {
        [b'/', drive, b':', ..] if drive.is_ascii_alphabetic() => &decoded[1..],
        _ => &decoded[..],
    };
    Some(PathBuf::from(trimmed.replace('/', "\\")))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("/home/user/project/app.py", "file:///home/user/project/app.py")]
    #[case::space("/tmp/my project/a b.py", "file:///tmp/my%20project/a%20b.py")]
    #[case::unreserved("/a-b/c_d/e~f/g.py", "file:///a-b/c_d/e~f/g.py")]
    #[case::reserved("/tmp/x#y?z.py", "file:///tmp/x%23y%3Fz.py")]
    #[case::unicode("/tmp/caf\u{e9}.py", "file:///tmp/caf%C3%A9.py")]
    fn encodes_paths(#[case] path: &str, #[case] uri: &str) {
        assert_eq!(path_to_uri(Path::new(path)), uri);
        assert_eq!(
            uri_to_path(uri).expect("uri should decode"),
            PathBuf::from(path)
        );
    }

    #[test]
    fn localhost_is_accepted() {
        assert_eq!(
            uri_to_path("file://localhost/tmp/a.py").expect("uri should decode"),
            PathBuf::from("/tmp/a.py")
        );
    }

    #[rstest]
    #[case::other_scheme("untitled:Untitled-1")]
    #[case::http("https://example.com/a.py")]
    #[case::host("file://server/share/a.py")]
    #[case::bare_path("/tmp/a.py")]
    fn rejects_non_file_uris(#[case] uri: &str) {
        assert!(matches!(uri_to_path(uri), Err(Error::InvalidUri(_))));
    }

    #[test]
    fn non_utf8_paths_round_trip() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/tmp/bad\xFFname.py"));
        let uri = path_to_uri(path);

        assert_eq!(uri, "file:///tmp/bad%FFname.py");
        assert_eq!(uri_to_path(&uri).expect("uri should decode"), path);
    }
}
