//! Guru Session Orchestrator
//!
//! Owns the tutoring session state machine: the mastery score, the
//! append-only history, the phase, and the trace log. The orchestrator is
//! the single writer; the presentation layer reads state through shared
//! references and drives transitions through three entry points (start,
//! answer, continue).
//!
//! # Example
//!
//! ```no_run
//! use guru_gateway::{ModelGateway, OpenAiClient};
//! use guru_session::Orchestrator;
//!
//! # async fn example() -> guru_session::Result<()> {
//! let client = OpenAiClient::new(None, "gpt-4o-mini", None);
//! let mut orchestrator = Orchestrator::new(ModelGateway::new(client));
//!
//! orchestrator.start_session("Algebra", "9", "CBSE Mathematics").await?;
//! orchestrator.submit_answer(2).await?;
//! println!("mastery: {}", orchestrator.session().map_or(0, |s| s.mastery()));
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod orchestrator;
mod session;
mod trace;

pub use config::Config;
pub use error::{Result, SessionError};
pub use orchestrator::Orchestrator;
pub use session::{
    HistoryEvent, Phase, Session, MASTERY_GAIN, MASTERY_LOSS, MASTERY_MAX,
};
pub use trace::{AgentId, TraceEntry, TraceLog, TraceStatus};
