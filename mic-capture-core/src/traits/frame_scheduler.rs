/// Identifier for a pending frame request, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// Per-frame callback scheduler, driven by the display refresh rather than
/// a fixed timer. Equivalent to `requestAnimationFrame` /
/// `cancelAnimationFrame`.
pub trait FrameScheduler: Send + Sync {
    fn request_frame(&self, callback: Box<dyn FnOnce() + Send + 'static>) -> FrameRequestId;

    fn cancel_frame(&self, id: FrameRequestId);
}
