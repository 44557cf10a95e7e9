//! Switch CLI session over SSH
//!
//! Implements the `DeviceSession`/`SessionOpener` seam on top of the ssh2
//! crate: password auth, an interactive PTY shell, prompt discovery, paging
//! disable, `enable`-style privilege elevation, and prompt-delimited command
//! capture. Everything here is blocking; workers run it inside
//! `tokio::task::spawn_blocking`.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use ssh2::{Channel, Session};

use crate::constants::{
    CHANNEL_POLL_TIMEOUT_MS, COMMAND_TIMEOUT_SECS, DISABLE_PAGING_COMMAND, PROMPT_TIMEOUT_SECS,
    SSH_NEGOTIATION_TIMEOUT_MS, SSH_PORT, TCP_CONNECT_TIMEOUT_SECS,
};
use crate::core::session::{DeviceSession, SessionOpener};
use crate::logger;
use crate::models::{Credentials, SecureString};
use crate::utils::SessionError;

/// Opens real SSH sessions to devices
pub struct SshOpener;

impl SessionOpener for SshOpener {
    fn open(
        &self,
        address: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn DeviceSession>, SessionError> {
        SshSession::open(address, credentials)
            .map(|session| Box::new(session) as Box<dyn DeviceSession>)
    }
}

/// One interactive shell session to a switch
///
/// Holds the discovered CLI prompt; command output is captured by reading
/// until that prompt reappears (it changes from `>` to `#` after
/// elevation). The channel is closed on drop, so the session is released on
/// every path.
pub struct SshSession {
    address: String,
    password: SecureString,
    _session: Session,
    channel: Channel,
    prompt: String,
}

impl std::fmt::Debug for SshSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshSession")
            .field("address", &self.address)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl SshSession {
    /// Establish a session and bring the device CLI to a known prompt
    pub fn open(address: &str, credentials: &Credentials) -> Result<Self, SessionError> {
        logger::log_debug(&format!("opening SSH session to {address}"));

        let sockaddr = (address, SSH_PORT)
            .to_socket_addrs()
            .map_err(|e| SessionError::Connection(format!("resolve {address}: {e}")))?
            .next()
            .ok_or_else(|| SessionError::Connection(format!("no usable address for {address}")))?;

        let tcp = TcpStream::connect_timeout(
            &sockaddr,
            Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        )
        .map_err(|e| SessionError::Connection(format!("connect to {sockaddr}: {e}")))?;

        let mut session = Session::new()
            .map_err(|e| SessionError::Connection(format!("session init failed: {e}")))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(SSH_NEGOTIATION_TIMEOUT_MS);
        session
            .handshake()
            .map_err(|e| SessionError::Connection(format!("SSH handshake failed: {e}")))?;

        session
            .userauth_password(
                credentials.username().as_str(),
                credentials.password().as_str(),
            )
            .map_err(|_| SessionError::Authentication)?;
        if !session.authenticated() {
            return Err(SessionError::Authentication);
        }

        let mut channel = session
            .channel_session()
            .map_err(|e| SessionError::Connection(format!("channel open failed: {e}")))?;
        channel
            .request_pty("vt100", None, Some((80, 24, 0, 0)))
            .map_err(|e| SessionError::Connection(format!("PTY request failed: {e}")))?;
        channel
            .shell()
            .map_err(|e| SessionError::Connection(format!("shell request failed: {e}")))?;

        // Interactive phase: short poll slices so prompt scanning and the
        // read deadlines stay responsive.
        session.set_timeout(CHANNEL_POLL_TIMEOUT_MS);

        let mut shell = SshSession {
            address: address.to_string(),
            password: credentials.password().clone(),
            _session: session,
            channel,
            prompt: String::new(),
        };

        // Some devices print the prompt only after input.
        shell
            .send_line("")
            .map_err(|e| SessionError::Connection(format!("shell write failed: {e}")))?;
        let banner = shell.read_until_quiet(Duration::from_secs(PROMPT_TIMEOUT_SECS))?;
        shell.prompt = last_prompt_line(&banner)
            .ok_or_else(|| SessionError::Connection("device sent no prompt".to_string()))?;
        logger::log_debug(&format!("{address} prompt detected: '{}'", shell.prompt));

        shell.disable_paging()?;
        Ok(shell)
    }

    /// Turn off terminal paging so long configurations print in one piece
    ///
    /// Output is discarded; platforms without the command print an error and
    /// return to the prompt.
    fn disable_paging(&mut self) -> Result<(), SessionError> {
        self.send_line(DISABLE_PAGING_COMMAND)
            .map_err(|e| SessionError::Connection(format!("shell write failed: {e}")))?;
        let prompt = self.prompt.clone();
        self.read_until(Duration::from_secs(PROMPT_TIMEOUT_SECS), |s| {
            ends_with_prompt(s, &prompt)
        })?;
        Ok(())
    }

    fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.channel.write_all(line.as_bytes())?;
        self.channel.write_all(b"\n")?;
        self.channel.flush()
    }

    /// One poll slice of channel output; `None` when the slice elapsed with
    /// no data
    fn poll_chunk(&mut self) -> Result<Option<String>, SessionError> {
        let mut buf = [0u8; 8192];
        match self.channel.read(&mut buf) {
            Ok(0) => Err(SessionError::Connection(
                "session closed by device".to_string(),
            )),
            Ok(n) => Ok(Some(String::from_utf8_lossy(&buf[..n]).into_owned())),
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                Ok(None)
            }
            Err(e) => Err(SessionError::CommandFailed(format!(
                "read from {}: {e}",
                self.address
            ))),
        }
    }

    /// Accumulate output until `done` matches or `deadline` elapses
    fn read_until<P>(&mut self, deadline: Duration, done: P) -> Result<String, SessionError>
    where
        P: Fn(&str) -> bool,
    {
        let start = Instant::now();
        let mut collected = String::new();
        loop {
            if let Some(chunk) = self.poll_chunk()? {
                collected.push_str(&chunk);
                if done(&collected) {
                    return Ok(collected);
                }
            }
            if start.elapsed() >= deadline {
                return Err(SessionError::Timeout(deadline));
            }
        }
    }

    /// Accumulate output until the device goes quiet for one poll slice
    fn read_until_quiet(&mut self, deadline: Duration) -> Result<String, SessionError> {
        let start = Instant::now();
        let mut collected = String::new();
        loop {
            match self.poll_chunk()? {
                Some(chunk) => collected.push_str(&chunk),
                None if !collected.is_empty() => return Ok(collected),
                None => {}
            }
            if start.elapsed() >= deadline {
                if collected.is_empty() {
                    return Err(SessionError::Timeout(deadline));
                }
                return Ok(collected);
            }
        }
    }
}

impl DeviceSession for SshSession {
    fn address(&self) -> &str {
        &self.address
    }

    fn elevate_privilege(&mut self) -> Result<(), SessionError> {
        if self.prompt.ends_with('#') {
            // already privileged
            return Ok(());
        }

        self.send_line("enable")
            .map_err(|e| SessionError::Elevation(format!("send enable: {e}")))?;

        let mut transcript = self
            .read_until(Duration::from_secs(PROMPT_TIMEOUT_SECS), |s| {
                is_password_prompt(s) || has_privileged_prompt(s)
            })
            .map_err(|e| SessionError::Elevation(format!("no response to enable: {e}")))?;

        if is_password_prompt(&transcript) {
            // the elevation secret is the login password
            let secret = self.password.clone();
            self.send_line(secret.as_str())
                .map_err(|e| SessionError::Elevation(format!("send enable secret: {e}")))?;
            let after = self
                .read_until(Duration::from_secs(PROMPT_TIMEOUT_SECS), has_privileged_prompt)
                .map_err(|_| {
                    SessionError::Elevation("device rejected enable secret".to_string())
                })?;
            transcript.push_str(&after);
        }

        match last_prompt_line(&transcript) {
            Some(prompt) if prompt.ends_with('#') => {
                self.prompt = prompt;
                Ok(())
            }
            _ => Err(SessionError::Elevation(
                "device did not enter privileged mode".to_string(),
            )),
        }
    }

    fn execute(&mut self, command: &str) -> Result<String, SessionError> {
        self.send_line(command)
            .map_err(|e| SessionError::CommandFailed(format!("send '{command}': {e}")))?;
        let prompt = self.prompt.clone();
        let raw = self.read_until(Duration::from_secs(COMMAND_TIMEOUT_SECS), |s| {
            ends_with_prompt(s, &prompt)
        })?;
        Ok(extract_command_output(&raw, command, &prompt))
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        // release the channel on every path, including failures mid-backup
        let _ = self.channel.close();
        let _ = self.channel.wait_close();
    }
}

/// Last non-empty line of a transcript, trimmed: the device prompt
fn last_prompt_line(output: &str) -> Option<String> {
    output
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn ends_with_prompt(buffer: &str, prompt: &str) -> bool {
    buffer.trim_end().ends_with(prompt)
}

fn has_privileged_prompt(buffer: &str) -> bool {
    last_prompt_line(buffer).is_some_and(|line| line.ends_with('#'))
}

fn is_password_prompt(buffer: &str) -> bool {
    buffer.trim_end().to_ascii_lowercase().ends_with("password:")
}

/// Strip the echoed command and the trailing prompt from a raw capture,
/// leaving the device's response text untouched
fn extract_command_output(raw: &str, command: &str, prompt: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "");
    let mut lines: Vec<&str> = normalized.lines().collect();

    // drop everything through the echoed command
    if let Some(echo) = lines.iter().position(|line| line.contains(command)) {
        lines.drain(..=echo);
    }

    // drop the trailing prompt and any blank tail
    while let Some(last) = lines.last() {
        let trimmed = last.trim();
        if trimmed.is_empty() || trimmed == prompt {
            lines.pop();
        } else {
            break;
        }
    }

    let mut output = lines.join("\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}
