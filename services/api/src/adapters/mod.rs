pub mod analysis_llm;
pub mod db;
pub mod identity;

pub use analysis_llm::GatewayCompletionAdapter;
pub use db::DbAdapter;
pub use identity::IdentityAdapter;
