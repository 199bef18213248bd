use std::num::NonZeroU32;

use glutin::error::ErrorKind;
use winit::dpi::PhysicalSize;

use super::PresentErrorAction;

/// Returns the size as non-zero dimensions, or `None` for a collapsed window.
pub(crate) fn nonzero_size(size: PhysicalSize<u32>) -> Option<(NonZeroU32, NonZeroU32)> {
    Some((NonZeroU32::new(size.width)?, NonZeroU32::new(size.height)?))
}

pub(crate) fn classify_present_error(kind: ErrorKind) -> PresentErrorAction {
    match kind {
        ErrorKind::ContextLost | ErrorKind::BadContext | ErrorKind::BadDisplay => PresentErrorAction::Fatal,
        _ => PresentErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_window_has_no_nonzero_size() {
        assert!(nonzero_size(PhysicalSize::new(0, 600)).is_none());
        assert!(nonzero_size(PhysicalSize::new(800, 0)).is_none());
    }

    #[test]
    fn regular_window_keeps_its_size() {
        let (w, h) = nonzero_size(PhysicalSize::new(800, 600)).unwrap();
        assert_eq!((w.get(), h.get()), (800, 600));
    }

    #[test]
    fn lost_context_is_fatal() {
        assert_eq!(classify_present_error(ErrorKind::ContextLost), PresentErrorAction::Fatal);
        assert_eq!(classify_present_error(ErrorKind::BadSurface), PresentErrorAction::SkipFrame);
    }
}
