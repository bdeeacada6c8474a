// graph.rs

use std::{
    collections::HashSet,
    path::PathBuf,
    process::Stdio,
    sync::{Arc, Mutex},
};

use futures::future::BoxFuture;
use tokio::{process::Command, task::JoinHandle, time::{Duration, timeout}};
use tracing::*;

use crate::{DashError, DashResult};

/// External program that draws the graph images. Only its argument is known to us,
/// the image shows up later under the span's image key.
pub trait GraphRenderer: Send + Sync {
    fn render(&self, arg: &'static str) -> BoxFuture<'static, DashResult<()>>;
}

#[derive(Clone, Debug)]
pub struct ShellRenderer {
    pub exec: PathBuf,
}

impl ShellRenderer {
    pub fn new<P: Into<PathBuf>>(exec: P) -> Self {
        ShellRenderer { exec: exec.into() }
    }
}

impl GraphRenderer for ShellRenderer {
    fn render(&self, arg: &'static str) -> BoxFuture<'static, DashResult<()>> {
        let exec = self.exec.clone();
        Box::pin(async move {
            let status = Command::new(&exec)
                .arg(arg)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .status()
                .await
                .map_err(|e| DashError::RendererInvocationFailed(format!("{exec:?} {arg}: {e}")))?;

            if !status.success() {
                return Err(DashError::RendererInvocationFailed(format!(
                    "{exec:?} {arg}: {status}"
                )));
            }
            Ok(())
        })
    }
}

/// Runs the renderer as a detached best-effort task. Failures and timeouts are logged
/// and go nowhere else. At most one render per argument runs at a time.
#[derive(Clone)]
pub struct GraphInvoker {
    renderer: Arc<dyn GraphRenderer>,
    limit: Duration,
    in_flight: Arc<Mutex<HashSet<&'static str>>>,
}

/// Holds an argument's in-flight slot until the render task ends, even by panic.
struct InFlight {
    set: Arc<Mutex<HashSet<&'static str>>>,
    arg: &'static str,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(self.arg);
    }
}

impl GraphInvoker {
    pub fn new(renderer: Arc<dyn GraphRenderer>, limit: Duration) -> Self {
        GraphInvoker {
            renderer,
            limit,
            in_flight: Arc::default(),
        }
    }

    /// Returns `None` when a render for `arg` is still running.
    pub fn spawn(&self, arg: &'static str) -> Option<JoinHandle<()>> {
        let fresh = self
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(arg);
        if !fresh {
            debug!("Render already running: {arg}");
            return None;
        }

        let guard = InFlight {
            set: self.in_flight.clone(),
            arg,
        };
        let renderer = self.renderer.clone();
        let limit = self.limit;
        Some(tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = render_bounded(renderer.as_ref(), arg, limit).await {
                warn!("{e}");
            }
        }))
    }

    /// Like `spawn` but waits for the render to finish or time out. If one is
    /// already running for `arg`, returns at once.
    pub async fn render_and_wait(&self, arg: &'static str) {
        let Some(handle) = self.spawn(arg) else {
            return;
        };
        if let Err(e) = handle.await {
            error!("Renderer task died: {e:?}");
        }
    }
}

async fn render_bounded(
    renderer: &dyn GraphRenderer,
    arg: &'static str,
    limit: Duration,
) -> DashResult<()> {
    debug!("Rendering graphs: {arg}");
    match timeout(limit, renderer.render(arg)).await {
        Ok(res) => res,
        Err(_) => Err(DashError::RendererInvocationFailed(format!(
            "{arg}: timed out after {limit:?}"
        ))),
    }
}


// EOF
