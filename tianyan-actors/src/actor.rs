use anyhow::Result;
use tianyan_common::TianyanError;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};

/// Minimal actor trait. `Self: Sized` keeps `Context<Self>` usable.
#[async_trait::async_trait]
pub trait Actor: Send + Sized + 'static {
    type Msg: Send + 'static;

    /// Handle a single message. Return `Err` to stop the actor.
    async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()>;
}

/// Runtime context for an actor instance.
pub struct Context<A: Actor> {
    addr: Addr<A>,
    pub stop: bool,
}

impl<A: Actor> Context<A> {
    /// A clone of this actor's own address, for replies that come back later.
    pub fn addr(&self) -> Addr<A> {
        self.addr.clone()
    }

    /// Stop after the current message.
    pub fn stop(&mut self) {
        self.stop = true;
    }
}

/// Address for sending messages to an actor.
pub struct Addr<A: Actor>(mpsc::Sender<A::Msg>);

impl<A: Actor> Clone for Addr<A> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<A: Actor> Addr<A> {
    /// Async send; awaits backpressure. Returns the message if the receiver is gone.
    pub async fn send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.send(msg).await.map_err(|e| e.0)
    }

    /// Send without waiting. Returns the message if the mailbox is full or closed.
    pub fn try_send(&self, msg: A::Msg) -> std::result::Result<(), A::Msg> {
        self.0.try_send(msg).map_err(|e| e.into_inner())
    }

    /// Send a message carrying a reply channel and wait for the answer.
    ///
    /// ```
    /// # use anyhow::Result;
    /// # use async_trait::async_trait;
    /// # use tianyan_actors::actor::{self, Actor, Context};
    /// # use tokio::sync::oneshot;
    /// struct Upper;
    ///
    /// #[async_trait]
    /// impl Actor for Upper {
    ///     type Msg = (String, oneshot::Sender<String>);
    ///     async fn handle(&mut self, (s, reply): Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
    ///         let _ = reply.send(s.to_uppercase());
    ///         ctx.stop();
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let actor::ActorHandle { addr, task } = actor::spawn_actor(Upper, 4);
    ///     let out = addr.ask(|tx| ("tianyan".to_string(), tx)).await.unwrap();
    ///     assert_eq!(out, "TIANYAN");
    ///     drop(addr);
    ///     task.await.unwrap().unwrap();
    /// });
    /// ```
    pub async fn ask<R, F>(&self, make: F) -> tianyan_common::Result<R>
    where
        F: FnOnce(oneshot::Sender<R>) -> A::Msg,
    {
        let (tx, rx) = oneshot::channel();
        self.send(make(tx))
            .await
            .map_err(|_| TianyanError::Mailbox(std::any::type_name::<A>()))?;
        rx.await
            .map_err(|_| TianyanError::NoReply(std::any::type_name::<A>()))
    }

    /// Bounded mailbox capacity.
    pub fn capacity(&self) -> usize {
        self.0.max_capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

/// Handle to a running actor task.
pub struct ActorHandle<A: Actor> {
    pub addr: Addr<A>,
    pub task: JoinHandle<anyhow::Result<()>>,
}

/// Spawn an actor with a bounded mailbox.
///
/// The actor stops when `handle` returns `Err`, after `ctx.stop()`, or on
/// the shutdown signal. Its own `Context` keeps an `Addr`, so dropping the
/// outside addresses alone does not end it.
///
/// ```
/// # use anyhow::Result;
/// # use async_trait::async_trait;
/// # use tianyan_actors::actor::{self, Actor, Context};
/// # struct Accumulator(u8);
/// # #[async_trait]
/// # impl Actor for Accumulator {
/// #     type Msg = u8;
/// #     async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
/// #         self.0 += msg;
/// #         if self.0 >= 5 {
/// #             ctx.stop();
/// #         }
/// #         Ok(())
/// #     }
/// # }
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let actor::ActorHandle { addr, task } = actor::spawn_actor(Accumulator(0), 8);
///     assert_eq!(addr.capacity(), 8);
///     addr.send(2).await.unwrap();
///     addr.send(3).await.unwrap();
///     drop(addr);
///     task.await.unwrap().unwrap();
/// });
/// ```
pub fn spawn_actor<A: Actor>(actor: A, capacity: usize) -> ActorHandle<A> {
    spawn_actor_with_shutdown(actor, capacity, None)
}

pub fn spawn_actor_with_shutdown<A: Actor>(
    actor: A,
    capacity: usize,
    shutdown: Option<broadcast::Receiver<()>>,
) -> ActorHandle<A> {
    spawn_actor_reserved::<A>(std::any::type_name::<A>(), capacity)
        .start_with_shutdown(actor, shutdown)
}

async fn run_loop<A: Actor>(
    mut actor: A,
    mut rx: mpsc::Receiver<A::Msg>,
    mut ctx: Context<A>,
    mut shutdown: Option<broadcast::Receiver<()>>,
    name: String,
) -> Result<()> {
    loop {
        let next = match shutdown.as_mut() {
            Some(shutdown_rx) => tokio::select! {
                _ = shutdown_rx.recv() => None,
                msg = rx.recv() => msg,
            },
            None => rx.recv().await,
        };
        let Some(msg) = next else { break };

        if let Err(e) = actor.handle(msg, &mut ctx).await {
            tracing::error!(target: "tianyan.actors", actor = %name, error = ?e, "actor.failed");
            return Err(e);
        }
        if ctx.stop {
            break;
        }
    }
    tracing::debug!(target: "tianyan.actors", actor = %name, "actor.stopped");
    Ok(())
}

/// Mailbox and address created up front; the task starts later.
///
/// Lets actors that refer to each other be wired before any of them runs.
pub struct Reserved<A: Actor> {
    name: String,
    addr: Addr<A>,
    rx: mpsc::Receiver<A::Msg>,
}

impl<A: Actor> Reserved<A> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addr(&self) -> Addr<A> {
        self.addr.clone()
    }

    /// Start the actor on the reserved mailbox.
    ///
    /// ```
    /// # use anyhow::Result;
    /// # use async_trait::async_trait;
    /// # use tianyan_actors::actor::{self, Actor, Context};
    /// # struct Echo;
    /// # #[async_trait]
    /// # impl Actor for Echo {
    /// #     type Msg = &'static str;
    /// #     async fn handle(&mut self, msg: Self::Msg, ctx: &mut Context<Self>) -> Result<()> {
    /// #         assert_eq!(msg, "ping");
    /// #         ctx.stop();
    /// #         Ok(())
    /// #     }
    /// # }
    /// let rt = tokio::runtime::Runtime::new().unwrap();
    /// rt.block_on(async {
    ///     let reserved = actor::spawn_actor_reserved::<Echo>("echo", 4);
    ///     let addr = reserved.addr();
    ///     let handle = reserved.start(Echo);
    ///     addr.send("ping").await.unwrap();
    ///     drop(addr);
    ///     handle.task.await.unwrap().unwrap();
    /// });
    /// ```
    pub fn start(self, actor: A) -> ActorHandle<A> {
        self.start_with_shutdown(actor, None)
    }

    pub fn start_with_shutdown(
        self,
        actor: A,
        shutdown: Option<broadcast::Receiver<()>>,
    ) -> ActorHandle<A> {
        let Reserved { name, addr, rx } = self;
        let ctx = Context {
            addr: addr.clone(),
            stop: false,
        };
        let task = tokio::spawn(run_loop(actor, rx, ctx, shutdown, name));
        ActorHandle { addr, task }
    }
}

pub fn spawn_actor_reserved<A: Actor>(name: impl Into<String>, capacity: usize) -> Reserved<A> {
    let (tx, rx) = mpsc::channel::<A::Msg>(capacity);
    Reserved {
        name: name.into(),
        addr: Addr(tx),
        rx,
    }
}
