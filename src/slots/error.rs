use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("chat count must be between 2 and 6, got {value}")]
    ChatCountOutOfRange { value: u8 },
    #[error("chat count `{raw}` is not a number")]
    ChatCountUnparseable { raw: String },
    #[error("template `{template}` needs {required} chats but only {configured} are configured")]
    InsufficientChats {
        template: String,
        required: u8,
        configured: u8,
    },
    #[error("unknown template `{template}`")]
    UnknownTemplate { template: String },
    #[error(transparent)]
    Store(#[from] ConfigError),
}
