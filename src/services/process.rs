//! External process lifecycle: spawn, stream, terminate.

use crate::error::{Result, SearchError};
use crate::services::backend::{BackendAdapter, Invocation, ParseContext, ParsedLine};
use crate::types::{Match, SearchOptions};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// Runs `invocation` to completion, handing each parsed match to `on_match`
/// in arrival order. Returns the number of matches delivered.
///
/// The child is killed and reaped on cancellation and on every error path;
/// `kill_on_drop` covers the caller dropping this future early.
pub(crate) async fn execute<F>(
    adapter: &BackendAdapter,
    invocation: &Invocation,
    roots: &[PathBuf],
    options: &SearchOptions,
    cancellation_token: &CancellationToken,
    mut on_match: F,
) -> Result<usize>
where
    F: FnMut(Match),
{
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .current_dir(&invocation.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    log::debug!("Executing {}: {:?}", adapter.id(), cmd);

    let mut child = cmd.spawn().map_err(|source| SearchError::LaunchFailure {
        executable: invocation.program.display().to_string(),
        source,
    })?;

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        terminate(&mut child).await;
        return Err(SearchError::LaunchFailure {
            executable: invocation.program.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "output pipes not captured"),
        });
    };

    // stderrもバックグラウンドで読み取り
    let stderr_task = tokio::spawn(async move {
        let mut content = Vec::new();
        let _ = BufReader::new(stderr).read_to_end(&mut content).await;
        String::from_utf8_lossy(&content).into_owned()
    });

    let ctx = ParseContext {
        roots,
        cwd: &invocation.cwd,
    };
    let mut segments = BufReader::new(stdout).split(b'\n');
    let mut delivered = 0usize;

    loop {
        let segment = tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => {
                log::info!("{} search cancelled, terminating process", adapter.id());
                terminate(&mut child).await;
                stderr_task.abort();
                return Err(SearchError::Cancelled);
            }
            segment = segments.next_segment() => segment,
        };

        match segment {
            Ok(Some(bytes)) => {
                let raw = String::from_utf8_lossy(&bytes);
                if let ParsedLine::Match(mut m) = adapter.parse_line(&raw, &ctx) {
                    if let Some(max) = options.max_text_len {
                        m.truncate_text(max);
                    }
                    delivered += 1;
                    on_match(m);

                    // 大量の結果の場合は適度にyieldして他のタスクに譲る
                    if delivered % 100 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                terminate(&mut child).await;
                stderr_task.abort();
                return Err(SearchError::BackendError {
                    backend: adapter.id(),
                    code: None,
                    stderr: format!("failed to read output: {}", e),
                });
            }
        }
    }

    let status = tokio::select! {
        biased;
        _ = cancellation_token.cancelled() => {
            terminate(&mut child).await;
            stderr_task.abort();
            return Err(SearchError::Cancelled);
        }
        status = child.wait() => status,
    };

    let stderr = stderr_task.await.unwrap_or_default();
    let status = status.map_err(|e| SearchError::BackendError {
        backend: adapter.id(),
        code: None,
        stderr: format!("failed to wait for process: {}", e),
    })?;

    if !stderr.trim().is_empty() {
        log::debug!("{} stderr: {}", adapter.id(), stderr.trim());
    }

    match adapter.check_exit(status.code(), &stderr) {
        Ok(()) => {
            log::debug!("{} finished with {} matches", adapter.id(), delivered);
            Ok(delivered)
        }
        Err(e) => {
            log::warn!("{}", e);
            Err(e)
        }
    }
}

/// Kills the child and waits for it so no zombie is left behind
async fn terminate(child: &mut Child) {
    if let Err(e) = child.kill().await {
        log::warn!("Failed to terminate search process: {}", e);
    }
}
