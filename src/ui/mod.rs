pub mod style;

pub use style::{OverlayStyleTokens, OVERLAY_TOKENS};
