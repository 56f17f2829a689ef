use crate::events::AppEvent;
use async_channel::Sender;
use petctl::command::{ControlCommand, SOCKET_PATH};
use tokio::io::{AsyncBufReadExt, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::net::UnixListener;

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("Another deskpet is already listening on {0}")]
    InUse(PathBuf),
    #[error("Failed to remove stale socket {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Removes a socket file left behind by an instance that is gone. A socket that still
/// accepts connections belongs to a running instance and is left alone.
pub fn clear_stale_socket(path: &Path) -> Result<(), SocketError> {
    if std::fs::symlink_metadata(path).is_err() {
        return Ok(());
    }
    if std::os::unix::net::UnixStream::connect(path).is_ok() {
        return Err(SocketError::InUse(path.to_path_buf()));
    }
    std::fs::remove_file(path).map_err(|source| SocketError::Remove {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Removed stale socket {}", path.display());
    Ok(())
}

/// Maps one socket line to an event. Blank lines are ignored, anything unparsable is
/// logged and dropped.
pub fn parse_line(line: &str) -> Option<AppEvent> {
    if line.trim().is_empty() {
        return None;
    }
    match line.parse::<ControlCommand>() {
        Ok(command) => Some(AppEvent::from(command)),
        Err(e) => {
            log::warn!("Ignoring control line {:?}: {}", line, e);
            None
        }
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    if let Err(e) = clear_stale_socket(Path::new(SOCKET_PATH)) {
        log::error!("Control socket unavailable: {}", e);
        return;
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::debug!("Listening on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if let Some(event) = parse_line(&line)
                            && tx.send(event).await.is_err()
                        {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
