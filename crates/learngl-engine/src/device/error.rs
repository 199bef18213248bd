/// What the runtime should do after a failed buffer swap.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PresentErrorAction {
    /// Transient failure; drop this frame and keep going.
    SkipFrame,
    /// The context is gone; stop the loop.
    Fatal,
}
