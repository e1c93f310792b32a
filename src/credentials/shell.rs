use std::io::{self, Write};

use super::Credential;

/// Write `credential` as environment assignments for the current shell family.
///
/// POSIX output is single-quoted so it survives `eval`; cmd.exe has no quoting
/// that `set` strips, so values are written verbatim there.
pub fn write_to_shell(credential: &Credential, windows: bool, out: &mut dyn Write) -> io::Result<()> {
    let vars = [
        ("AWS_ACCESS_KEY_ID", credential.access_key_id.as_str()),
        ("AWS_SECRET_ACCESS_KEY", credential.secret_access_key.as_str()),
        ("AWS_SESSION_TOKEN", credential.session_token.as_str()),
    ];

    for (key, value) in vars {
        if windows {
            writeln!(out, "set {}={}", key, value)?;
        } else {
            writeln!(out, "export {}='{}'", key, shell_escape(value))?;
        }
    }
    out.flush()
}

/// Shell-escape a value for single-quoted POSIX shell strings.
/// Replaces `'` with `'\''`.
fn shell_escape(value: &str) -> String {
    value.replace('\'', "'\\''")
}
