// This file is part of ENSNode.
//
// ENSNode is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// ENSNode is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with ENSNode.
// If not, see https://www.gnu.org/licenses/.

//! Task trait and helper functions

use async_trait::async_trait;
use futures::Future;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Core task trait implemented by top level ENSNode tasks.
#[async_trait]
pub trait Task: Sync + Send + 'static {
    /// Name used when logging the task's lifecycle.
    fn name(&self) -> &'static str;

    /// Run the task until `shutdown_token` is cancelled.
    async fn run(self: Box<Self>, shutdown_token: CancellationToken) -> anyhow::Result<()>;
}

type TaskExit = Result<(&'static str, anyhow::Result<()>), JoinError>;

/// Spawn a set of tasks and wait for a shutdown signal.
///
/// Every task is cancelled once the signal fires or any task exits, and all of
/// them are awaited before returning. Returns an error if a task exited before
/// the signal.
pub async fn spawn_tasks_with_shutdown<T, R, E>(
    tasks: impl IntoIterator<Item = Box<dyn Task>>,
    signal: T,
) -> anyhow::Result<()>
where
    T: Future<Output = Result<R, E>> + Send + 'static,
    E: std::fmt::Debug,
{
    let shutdown_token = CancellationToken::new();
    let mut running = JoinSet::new();
    for task in tasks {
        let name = task.name();
        let token = shutdown_token.clone();
        info!("Starting {name}");
        running.spawn(async move { (name, task.run(token).await) });
    }
    if running.is_empty() {
        anyhow::bail!("no tasks to run");
    }

    let early_exit = tokio::select! {
        Some(exit) = running.join_next() => Some(exit),
        res = signal => {
            match res {
                Ok(_) => info!("Received signal, shutting down"),
                Err(err) => error!("Error while waiting for signal: {err:?}"),
            }
            None
        }
    };

    shutdown_token.cancel();
    let result = match early_exit {
        Some(exit) => Err(unexpected_exit(exit)),
        None => Ok(()),
    };
    while let Some(exit) = running.join_next().await {
        match exit {
            Ok((name, Ok(()))) => info!("{name} stopped"),
            Ok((name, Err(err))) => error!("{name} failed while shutting down: {err:?}"),
            Err(err) => error!("Task panicked while shutting down: {err}"),
        }
    }
    result
}

fn unexpected_exit(exit: TaskExit) -> anyhow::Error {
    let err = match exit {
        Ok((name, Ok(()))) => anyhow::anyhow!("{name} exited unexpectedly"),
        Ok((name, Err(err))) => err.context(format!("{name} failed")),
        Err(err) => anyhow::anyhow!("task panicked: {err}"),
    };
    error!("{err:?}");
    err
}
