//! Multi-subscriber emission channel with a terminal state.
//!
//! [`EventChannel`] fans each published [`StreamEvent`] out to every current
//! [`Subscription`], in publish order. The channel is hot: subscribers only
//! see events published after they subscribed. Publishing a
//! [`StreamEvent::Terminal`] delivers it and then completes the channel;
//! every later publish is dropped and reported as [`ChannelClosed`].
//!
//! Publishing never blocks. Each subscription owns an unbounded queue, so a
//! slow subscriber delays only itself.

use std::{
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll},
};

use futures::Stream;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{ChannelClosed, DecodeError};

/// Event delivered to subscribers of a decoder.
#[derive(Debug)]
pub enum StreamEvent<P, E> {
    /// A record decoded successfully.
    Value(P),
    /// A record failed to decode; no further events follow.
    Terminal(Arc<DecodeError<E>>),
}

impl<P: Clone, E> Clone for StreamEvent<P, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(payload) => Self::Value(payload.clone()),
            Self::Terminal(err) => Self::Terminal(Arc::clone(err)),
        }
    }
}

impl<P, E> StreamEvent<P, E> {
    /// Return the payload if this is a [`StreamEvent::Value`].
    pub fn into_value(self) -> Option<P> {
        match self {
            Self::Value(payload) => Some(payload),
            Self::Terminal(_) => None,
        }
    }

    /// Whether this event completes the channel.
    pub fn is_terminal(&self) -> bool { matches!(self, Self::Terminal(_)) }
}

struct ChannelState<P, E> {
    subscribers: Vec<mpsc::UnboundedSender<StreamEvent<P, E>>>,
    closed: bool,
}

/// Hot publish/subscribe channel for [`StreamEvent`]s.
///
/// # Examples
///
/// ```
/// use lineframe::{EventChannel, StreamEvent};
///
/// let channel = EventChannel::<u8, ()>::new();
/// let mut first = channel.subscribe();
/// let mut second = channel.subscribe();
///
/// assert_eq!(channel.publish(StreamEvent::Value(7)), Ok(2));
/// assert!(matches!(first.try_next(), Some(StreamEvent::Value(7))));
/// assert!(matches!(second.try_next(), Some(StreamEvent::Value(7))));
/// ```
pub struct EventChannel<P, E> {
    state: Mutex<ChannelState<P, E>>,
}

impl<P, E> Default for EventChannel<P, E> {
    fn default() -> Self { Self::new() }
}

impl<P, E> EventChannel<P, E> {
    /// Create an open channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChannelState {
                subscribers: Vec::new(),
                closed: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChannelState<P, E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new subscriber.
    ///
    /// The subscription receives every event published from now on. On a
    /// closed channel it is already finished and yields nothing.
    pub fn subscribe(&self) -> Subscription<P, E> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state();
        if !state.closed {
            state.subscribers.push(tx);
        }
        Subscription { rx }
    }

    /// Whether the channel has completed.
    pub fn is_closed(&self) -> bool { self.state().closed }

    /// Number of registered subscribers that have not been dropped.
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.state();
        state.subscribers.retain(|tx| !tx.is_closed());
        state.subscribers.len()
    }

    /// Complete the channel without an error.
    ///
    /// Subscribers drain any queued events and then finish. Closing an
    /// already closed channel has no effect.
    pub fn close(&self) {
        let mut state = self.state();
        if state.closed {
            return;
        }
        state.closed = true;
        let subscribers = std::mem::take(&mut state.subscribers);
        debug!(subscribers = subscribers.len(), "event channel closed");
    }
}

impl<P: Clone, E> EventChannel<P, E> {
    /// Deliver `event` to every current subscriber.
    ///
    /// Returns the number of subscribers reached. A terminal event closes the
    /// channel once delivered.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelClosed`] if the channel has already completed. The
    /// event is dropped.
    pub fn publish(&self, event: StreamEvent<P, E>) -> Result<usize, ChannelClosed> {
        let mut state = self.state();
        if state.closed {
            debug!(
                terminal = event.is_terminal(),
                "event dropped: channel closed"
            );
            crate::metrics::inc_dropped_events();
            return Err(ChannelClosed);
        }

        let terminal = event.is_terminal();
        state.subscribers.retain(|tx| !tx.is_closed());
        let delivered = match state.subscribers.split_last() {
            None => 0,
            Some((last, rest)) => {
                let reached = rest
                    .iter()
                    .filter(|tx| tx.send(event.clone()).is_ok())
                    .count();
                reached + usize::from(last.send(event).is_ok())
            }
        };

        if terminal {
            state.closed = true;
            state.subscribers.clear();
            debug!(delivered, "terminal event published; channel closed");
        }
        Ok(delivered)
    }
}

/// Receiving side of an [`EventChannel`] registration.
///
/// A subscription yields events in publish order and finishes once the
/// channel completes and its queue is drained. It can be polled as a
/// [`Stream`], awaited with [`recv`](Self::recv), or drained synchronously.
#[derive(Debug)]
pub struct Subscription<P, E> {
    rx: mpsc::UnboundedReceiver<StreamEvent<P, E>>,
}

impl<P, E> Subscription<P, E> {
    /// Wait for the next event.
    ///
    /// Returns `None` once the channel has completed and every queued event
    /// was received.
    pub async fn recv(&mut self) -> Option<StreamEvent<P, E>> { self.rx.recv().await }

    /// Take the next queued event without waiting.
    pub fn try_next(&mut self) -> Option<StreamEvent<P, E>> { self.rx.try_recv().ok() }

    /// Block the current thread until the next event arrives.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_recv(&mut self) -> Option<StreamEvent<P, E>> { self.rx.blocking_recv() }

    /// Take every event queued so far.
    pub fn drain_ready(&mut self) -> Vec<StreamEvent<P, E>> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Whether the channel completed and no queued events remain.
    pub fn is_finished(&self) -> bool { self.rx.is_closed() && self.rx.is_empty() }
}

impl<P, E> Stream for Subscription<P, E> {
    type Item = StreamEvent<P, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
