//! Gesture naming and dispatch
//!
//! Decouples raw DOM-style input from the operations bound to it: wiring code
//! only ever sees gesture names such as `drag:shift:amv`.

mod dispatcher;
mod modifiers;
mod spec;

pub use dispatcher::*;
pub use modifiers::*;
pub use spec::*;
