/// Maximum number of chat-log rows returned by the history endpoint
pub const HISTORY_LIMIT: i64 = 50;

/// Number of recent exchanges replayed as prior turns for a conversation
pub const CONVERSATION_WINDOW: i64 = 10;

/// Length of the content preview shown in document listings
pub const CONTENT_PREVIEW_CHARS: usize = 200;

/// Maximum length of a document title
pub const MAX_TITLE_CHARS: usize = 500;
