//! # Shared Constants
//!
//! Values shared between the library, the server and the CLI. Keeping them in
//! one place avoids "magic" numbers drifting apart between crates.

/// The dimensionality of the query vectors accepted by the vector index.
pub const EMBEDDING_DIMENSION: usize = 1024;

/// The number of nearest passages fetched from the vector index per request.
pub const DEFAULT_TOP_K: usize = 15;

/// The maximum number of characters kept from each user message.
pub const MAX_USER_CHARS: usize = 200;

/// The default upper bound on a whole chat request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 150;

/// The default directory holding the historical sample files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// The text substituted into a prompt when no historical sample is available.
pub const SAMPLE_PLACEHOLDER: &str = "（暂无历史样本）";

/// The token marking where context is inserted into a persona template.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// The metadata field carrying passage text in vector search matches.
pub const PASSAGE_TEXT_FIELD: &str = "text";
