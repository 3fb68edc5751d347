//! Deferred image swaps
//!
//! Window/level and crop replace the displayed buffer. The pixel work runs
//! on tokio's blocking pool and the result comes back through a oneshot
//! channel; awaiting an [`ImageSwap`] yields a [`PreparedImage`] that the
//! session installs with `Session::finish_swap`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;

use crate::loader::DecodedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapKind {
    WindowLevel,
    Crop,
}

/// What a swap worker hands back
#[derive(Debug, Clone)]
pub struct SwapOutput {
    /// Replacement for the displayed (windowed) buffer
    pub image: DecodedImage,
    /// Replacement for the unwindowed working buffer, set by crops
    pub working: Option<DecodedImage>,
}

impl From<DecodedImage> for SwapOutput {
    fn from(image: DecodedImage) -> Self {
        Self {
            image,
            working: None,
        }
    }
}

/// Result of a finished swap, tagged with the generation it was started in
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub generation: u64,
    pub kind: SwapKind,
    pub image: DecodedImage,
    pub working: Option<DecodedImage>,
}

/// A pending buffer replacement
///
/// Resolves to `None` when the transform produced nothing (for instance a
/// crop box that misses the image) or the worker went away.
#[derive(Debug)]
pub struct ImageSwap {
    generation: u64,
    kind: SwapKind,
    receiver: oneshot::Receiver<Option<SwapOutput>>,
}

impl ImageSwap {
    /// Run `work` off the caller's thread
    ///
    /// Outside a tokio runtime the work runs inline; the result is still only
    /// observable by awaiting the swap.
    pub fn spawn<F>(generation: u64, kind: SwapKind, work: F) -> Self
    where
        F: FnOnce() -> Option<SwapOutput> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let job = move || {
            // The receiver may already be gone if the swap was dropped
            let _ = sender.send(work());
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => {
                log::debug!("No tokio runtime, running {kind:?} swap inline");
                job();
            }
        }
        Self {
            generation,
            kind,
            receiver,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> SwapKind {
        self.kind
    }
}

impl Future for ImageSwap {
    type Output = Option<PreparedImage>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let (generation, kind) = (self.generation, self.kind);
        self.receiver.poll_unpin(cx).map(|result| match result {
            Ok(Some(output)) => Some(PreparedImage {
                generation,
                kind,
                image: output.image,
                working: output.working,
            }),
            Ok(None) => {
                log::debug!("{kind:?} swap {generation} produced no image");
                None
            }
            Err(oneshot::Canceled) => {
                log::warn!("{kind:?} swap {generation} worker dropped its result");
                None
            }
        })
    }
}
