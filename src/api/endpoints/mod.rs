pub mod configs;
pub mod docs;
pub mod export;
pub mod llm;
pub mod ping;
pub mod script;
