pub mod chat_api_openai;
pub mod chat_proxy;
pub mod pages;
pub mod settings;
