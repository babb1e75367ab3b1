pub mod engine;
pub mod error;
pub mod evaluator;
pub mod normalize;
pub mod runner;
pub mod transport;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{ExecutionClient, PollPolicy, Sleeper, TokioSleeper};
pub use error::{Stage, TransportError};
pub use runner::BatchRunner;
pub use transport::{HttpTransport, SandboxTransport};
