pub mod session;
pub mod theme;

pub use session::{AuthView, SessionPhase, SessionState};
pub use theme::{Theme, ThemeState};
