//! WebSocket layer - upgrade handling and the echo session.

mod handler;
mod session;

pub use handler::upgrade;
pub use session::{
    EchoSession, SessionContext, SessionFactory, SessionHandler, SessionState, ECHO_PREFIX,
    GREETING,
};
