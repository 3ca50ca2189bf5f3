//! Shared fixtures for unit tests.

use std::path::{Path, PathBuf};

/// Stand-in for ffmpeg: answers `-version`, fails for inputs whose name
/// contains "bad", otherwise writes its own argument list to the output path.
const FAKE_FFMPEG: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
    echo "ffmpeg version 6.1-test"
    echo "configuration: --enable-libx264"
    exit 0
fi
input="$2"
for last; do :; done
case "$(basename "$input")" in
    *bad*)
        echo "$input: Invalid data found when processing input" >&2
        exit 1
        ;;
esac
echo "$@" > "$last"
"#;

/// Write the fake ffmpeg into `dir` and wait until it can be executed.
pub fn fake_ffmpeg(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffmpeg");
    std::fs::write(&path, FAKE_FFMPEG).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    // A concurrent fork in another test thread can briefly hold the file open
    // for writing, which makes exec fail with ETXTBSY.
    for _ in 0..50 {
        match std::process::Command::new(&path).arg("-version").output() {
            Err(e) if e.raw_os_error() == Some(26) => {
                std::thread::sleep(std::time::Duration::from_millis(20))
            }
            _ => break,
        }
    }
    path
}
