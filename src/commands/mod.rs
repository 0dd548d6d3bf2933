pub mod claim_commands;
pub mod create_commands;
pub mod env_commands;
pub mod output;

// 重新导出所有命令
pub use claim_commands::*;
pub use create_commands::*;
pub use env_commands::*;
