//! OrientationSource trait - device rotation event stream abstraction
//!
//! Decouples the orientation sampler from where samples come from: a real
//! platform sensor, a synthetic mock, or a recorded replay.

use std::sync::Arc;

use crate::OrientationSample;

/// Orientation callback type
///
/// Invoked once per delivered sample, in arrival order.
pub type OrientationCallback = Arc<dyn Fn(OrientationSample) + Send + Sync>;

/// Orientation event source
///
/// Mirrors the platform event-listener model: `listen` subscribes,
/// `stop` unsubscribes.
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn OrientationSource> = platform_source();
/// source.listen(Arc::new(|sample| {
///     println!("gamma = {}", sample.gamma);
/// }));
/// // ... view is shown ...
/// source.stop();
/// ```
pub trait OrientationSource: Send + Sync {
    /// Source name (for logs)
    fn name(&self) -> &str;

    /// Register the sample callback
    ///
    /// Repeated calls while already listening are ignored; only the first
    /// callback is kept.
    fn listen(&self, callback: OrientationCallback);

    /// Stop delivering samples
    ///
    /// Safe to call when not listening.
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
