use crate::actor::{Actor, ActorHandle, Addr, Reserved, spawn_actor_reserved, spawn_actor_with_shutdown};
use crate::registry::Registry;
use crate::system::{ActorSystem, ShutdownHandle};
use anyhow::Result;

/// Spawns actors, publishes their addresses and owns their shutdown.
pub struct Builder {
    sys: ActorSystem,
    reg: Registry,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            sys: ActorSystem::new(),
            reg: Registry::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.reg
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.sys.shutdown_handle()
    }

    /// Reserve an actor and publish its `Addr` under `name`.
    pub fn reserve<A>(&mut self, name: &str, mailbox: usize) -> Reserved<A>
    where
        A: Actor,
        Addr<A>: Send + Sync,
    {
        let r = spawn_actor_reserved::<A>(name, mailbox);
        self.reg.insert_addr::<A>(name, r.addr());
        r
    }

    /// Start a previously reserved actor and track its task.
    pub fn start_reserved<A>(&mut self, r: Reserved<A>, actor: A) -> &mut Self
    where
        A: Actor,
    {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h = r.start_with_shutdown(actor, Some(shutdown_rx));
        self.sys.track(async move {
            h.task.await??;
            Ok(())
        });
        self
    }

    /// Spawn an actor now and publish its `Addr` under `name`.
    ///
    /// ```
    /// # use anyhow::Result;
    /// # use async_trait::async_trait;
    /// # use tianyan_actors::actor::{Actor, Context};
    /// # use tianyan_actors::builder::Builder;
    /// # struct Sink;
    /// # #[async_trait]
    /// # impl Actor for Sink {
    /// #     type Msg = ();
    /// #     async fn handle(&mut self, _msg: (), _ctx: &mut Context<Self>) -> Result<()> { Ok(()) }
    /// # }
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let mut b = Builder::new();
    ///     b.spawn("sink", 4, || Sink);
    ///     assert!(b.addr::<Sink>("sink").is_some());
    ///     assert!(b.addr::<Sink>("other").is_none());
    ///     b.graceful_shutdown().await.unwrap();
    /// });
    /// ```
    pub fn spawn<A, F>(&mut self, name: &str, mailbox: usize, new: F) -> &mut Self
    where
        A: Actor,
        F: FnOnce() -> A,
        Addr<A>: Send + Sync,
    {
        let shutdown_rx = self.sys.shutdown_notifier();
        let h: ActorHandle<A> = spawn_actor_with_shutdown(new(), mailbox, Some(shutdown_rx));
        self.reg.insert_addr::<A>(name, h.addr.clone());
        self.sys.track(async move {
            h.task.await??;
            Ok(())
        });
        self
    }

    /// Typed address published under `name`.
    pub fn addr<A: Actor>(&self, name: &str) -> Option<Addr<A>>
    where
        Addr<A>: Send + Sync,
    {
        self.reg.get_addr::<A>(name)
    }

    pub async fn graceful_shutdown(self) -> Result<()> {
        self.reg.clear();
        self.sys.graceful_shutdown().await
    }

    /// Wait for Ctrl-C or an in-app shutdown signal, then stop everything.
    pub async fn run_until_shutdown(self) -> Result<()> {
        let mut shutdown_rx = self.sys.shutdown_notifier();
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(target: "tianyan.actors", "shutdown.ctrl_c");
            }
            _ = shutdown_rx.recv() => {
                tracing::info!(target: "tianyan.actors", "shutdown.requested");
            }
        }
        self.graceful_shutdown().await
    }
}
