pub mod http;
pub mod traits;
pub mod types;

pub use http::{HttpClient, build_http_client};
pub use traits::{GameApi, InterviewApi};
pub use types::{
    AgentConfig, Defaults, ExchangeResponse, ExportFormat, GameDefaults, GameInfo, GameMessage,
    GameRole, GameSessionSnapshot, GameTurnResponse, Message, Role, SessionSnapshot, SessionStatus,
    SimulateAllResponse, StartResponse, TranscriptExport,
};
