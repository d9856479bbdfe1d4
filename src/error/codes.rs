/// Error code registry for lexan
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration and usage errors
/// - 2000-2999: Setup errors (channel namespace, FIFO creation)
/// - 3000-3999: Spawn errors
/// - 4000-4999: Collection I/O and protocol errors
/// - 5000-5999: Output errors
/// - 6000-6999: Worker errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1002;
    pub const CONFIG_INVALID_VALUE: u16 = 1003;
    pub const CONFIG_MISSING_REQUIRED: u16 = 1004;

    // Setup errors (2000-2999)
    pub const SETUP_GENERIC: u16 = 2000;
    pub const SETUP_NAMESPACE_EXISTS: u16 = 2001;
    pub const SETUP_NAMESPACE_CREATE: u16 = 2002;
    pub const SETUP_FIFO_CREATE: u16 = 2003;
    pub const SETUP_INPUT_UNREADABLE: u16 = 2004;

    // Spawn errors (3000-3999)
    pub const SPAWN_GENERIC: u16 = 3000;
    pub const SPAWN_FAILED: u16 = 3001;
    pub const SPAWN_NO_STDOUT: u16 = 3002;
    pub const SPAWN_WORKER_PROGRAM: u16 = 3003;

    // Collection errors (4000-4999)
    pub const COLLECT_GENERIC: u16 = 4000;
    pub const COLLECT_OPEN_FAILED: u16 = 4001;
    pub const COLLECT_READ_FAILED: u16 = 4002;
    pub const COLLECT_MALFORMED_RECORD: u16 = 4003;
    pub const COLLECT_REAP_FAILED: u16 = 4004;

    // Output errors (5000-5999)
    pub const OUTPUT_GENERIC: u16 = 5000;
    pub const OUTPUT_WRITE_FAILED: u16 = 5001;

    // Worker errors (6000-6999)
    pub const WORKER_GENERIC: u16 = 6000;
    pub const WORKER_EXCLUSION_LOAD: u16 = 6001;
    pub const WORKER_INPUT_READ: u16 = 6002;
    pub const WORKER_CHANNEL_OPEN: u16 = 6003;
    pub const WORKER_CHANNEL_READ: u16 = 6004;
    pub const WORKER_CHANNEL_WRITE: u16 = 6005;
    pub const WORKER_REPORT: u16 = 6006;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        ErrorCode::CONFIG_GENERIC => "Configuration error",
        ErrorCode::CONFIG_NOT_FOUND => "Configuration file not found",
        ErrorCode::CONFIG_PARSE_ERROR => "Configuration file could not be parsed",
        ErrorCode::CONFIG_INVALID_VALUE => "Invalid configuration value",
        ErrorCode::CONFIG_MISSING_REQUIRED => "Required configuration value missing",

        ErrorCode::SETUP_GENERIC => "Pipeline setup error",
        ErrorCode::SETUP_NAMESPACE_EXISTS => "Channel namespace already exists",
        ErrorCode::SETUP_NAMESPACE_CREATE => "Failed to create channel namespace",
        ErrorCode::SETUP_FIFO_CREATE => "Failed to create named channel",
        ErrorCode::SETUP_INPUT_UNREADABLE => "Input file could not be read",

        ErrorCode::SPAWN_GENERIC => "Worker spawn error",
        ErrorCode::SPAWN_FAILED => "Failed to spawn worker process",
        ErrorCode::SPAWN_NO_STDOUT => "Worker completion pipe unavailable",
        ErrorCode::SPAWN_WORKER_PROGRAM => "Worker program could not be resolved",

        ErrorCode::COLLECT_GENERIC => "Result collection error",
        ErrorCode::COLLECT_OPEN_FAILED => "Failed to open builder result channel",
        ErrorCode::COLLECT_READ_FAILED => "Failed to read builder result channel",
        ErrorCode::COLLECT_MALFORMED_RECORD => "Malformed word-count record",
        ErrorCode::COLLECT_REAP_FAILED => "Failed to reap worker process",

        ErrorCode::OUTPUT_GENERIC => "Output error",
        ErrorCode::OUTPUT_WRITE_FAILED => "Failed to write output file",

        ErrorCode::WORKER_GENERIC => "Worker error",
        ErrorCode::WORKER_EXCLUSION_LOAD => "Failed to load exclusion list",
        ErrorCode::WORKER_INPUT_READ => "Failed to read input shard",
        ErrorCode::WORKER_CHANNEL_OPEN => "Failed to open worker channel",
        ErrorCode::WORKER_CHANNEL_READ => "Failed to read worker channel",
        ErrorCode::WORKER_CHANNEL_WRITE => "Failed to write worker channel",
        ErrorCode::WORKER_REPORT => "Failed to send completion message",

        _ => "Unknown error",
    }
}
