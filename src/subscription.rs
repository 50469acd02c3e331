use crate::decode::LineDecoder;
use crate::error::WatchError;
use crate::handle::ViewHandle;
use crate::view::Mode;
use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const READ_BUF_SIZE: usize = 8 * 1024;

/// What a subscription is scoped to: a resource kind, an optional
/// namespace, and an optional single-item name.
///
/// The name decides the view mode — present means a single-record view,
/// absent means a collection view. Building the remote request from a
/// target (paths, versions, connection) is the transport collaborator's
/// job; the core only uses the target as subscription identity.
///
/// # Examples
///
/// ```
/// use watchfold::{Mode, Target};
///
/// let all_pods = Target::new("Pod").with_namespace("default");
/// assert_eq!(all_pods.mode(), Mode::Collection);
///
/// let one_pod = Target::new("Pod").with_namespace("default").with_name("api-0");
/// assert_eq!(one_pod.mode(), Mode::Single);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    kind: String,
    namespace: Option<String>,
    name: Option<String>,
}

impl Target {
    /// Target every record of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Target {
            kind: kind.into(),
            namespace: None,
            name: None,
        }
    }

    /// Restrict the target to one namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Target one named record, switching the subscription to a
    /// single-record view.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The resource kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The namespace, if restricted.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The single-item name, if targeted.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// View mode implied by this target.
    pub fn mode(&self) -> Mode {
        if self.name.is_some() {
            Mode::Single
        } else {
            Mode::Collection
        }
    }
}

/// Cooperative cancellation signal for one subscription.
///
/// Clonable; the owner keeps one clone and hands another to the
/// subscription. The loop checks it before every read and before every
/// publish, so cancellation takes effect at the next of those points —
/// a read already blocked in the transport is not interrupted.
///
/// # Examples
///
/// ```
/// use watchfold::CancelToken;
///
/// let token = CancelToken::new();
/// let for_loop = token.clone();
/// assert!(!for_loop.is_canceled());
/// token.cancel();
/// assert!(for_loop.is_canceled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an unsignaled token.
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// True once [`cancel`](CancelToken::cancel) has been called.
    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// How a subscription's loop came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The byte source reported end of input.
    EndOfStream,
    /// The cancel token was signaled; buffered unpublished data was
    /// discarded.
    Canceled,
}

/// One cancellable stream-consumption session producing exactly one view.
///
/// A subscription owns its decoder buffer, its view, and its cancel token;
/// independent subscriptions share nothing. The transport collaborator
/// opens the connection and hands the body to [`run`](Subscription::run),
/// which blocks until end of stream, cancellation, or a transport error.
/// On reconnect, create a fresh subscription — views never carry across.
///
/// # Examples
///
/// ```
/// use watchfold::{Subscription, Target};
/// use std::io::Cursor;
///
/// let body = concat!(
///     r#"{"type":"ADDED","object":{"metadata":{"uid":"1"},"name":"a"}}"#, "\n",
///     r#"{"type":"ADDED","object":{"metadata":{"uid":"2"},"name":"b"}}"#, "\n",
/// );
///
/// let subscription = Subscription::new(Target::new("Pod"));
/// let view = subscription.view();
/// subscription.run(Cursor::new(body)).unwrap();
///
/// assert_eq!(view.records().len(), 2);
/// ```
pub struct Subscription {
    target: Target,
    view: ViewHandle,
    cancel: CancelToken,
}

impl Subscription {
    /// Create a subscription for the given target, with a fresh view in the
    /// mode the target implies.
    pub fn new(target: Target) -> Self {
        let view = ViewHandle::new(target.mode());
        Subscription {
            target,
            view,
            cancel: CancelToken::new(),
        }
    }

    /// The target this subscription is scoped to.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Handle to the view this subscription maintains.
    pub fn view(&self) -> ViewHandle {
        self.view.clone()
    }

    /// Token that ends this subscription when signaled.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the decode-and-reconcile loop over one stream body.
    ///
    /// Consumes the subscription — one loop per subscription, and the view
    /// dies with it (handles obtained earlier keep the final state; nothing
    /// carries into a replacement subscription). Blocks on `source.read` as
    /// its sole suspension point; everything else runs synchronously per
    /// chunk, publishing through the view handle after each folded event.
    /// Decoding failures are skipped inside the decoder; only transport
    /// failures are terminal.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Transport`] when the source fails. End of
    /// stream and cancellation are ordinary [`Outcome`]s, not errors.
    pub fn run<R: Read>(self, mut source: R) -> Result<Outcome, WatchError> {
        let mut decoder = LineDecoder::new();
        let mut chunk = vec![0; READ_BUF_SIZE];
        log::debug!("subscription {:?}: starting watch loop", self.target);

        loop {
            if self.cancel.is_canceled() {
                log::debug!("subscription {:?}: canceled before read", self.target);
                return Ok(Outcome::Canceled);
            }
            let n = match source.read(&mut chunk) {
                Ok(0) => {
                    decoder.finish();
                    log::debug!("subscription {:?}: end of stream", self.target);
                    return Ok(Outcome::EndOfStream);
                }
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    log::debug!("subscription {:?}: transport failure: {err}", self.target);
                    return Err(WatchError::Transport(err));
                }
            };
            decoder.feed(&chunk[..n]);
            while let Some(event) = decoder.next_event() {
                if self.cancel.is_canceled() {
                    log::debug!("subscription {:?}: canceled before publish", self.target);
                    return Ok(Outcome::Canceled);
                }
                log::trace!("subscription {:?}: {} {}", self.target, event.kind(), event.record().uid());
                self.view.publish(&event);
            }
        }
    }
}
